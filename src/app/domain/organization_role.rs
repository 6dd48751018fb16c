use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Built-in role names every deployment knows about. Memberships may also
/// carry organization-defined role names; see [`super::RoleName`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")] // Serialize as lowercase string
#[strum(serialize_all = "lowercase")] // Display/FromStr as lowercase string
pub enum OrganizationRole {
    Owner,
    Admin,
    Member,
    User,
    Viewer,
}

/// Role definition scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoleScope {
    /// Applies in every organization; has no organization association.
    System,
    /// Applies only inside the one organization it is attached to.
    Organization,
}

/// Organization lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrganizationStatus {
    Active,
    Inactive,
    Suspended,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn roles_round_trip_through_strings() {
        assert_eq!(OrganizationRole::Owner.to_string(), "owner");
        assert_eq!(OrganizationRole::from_str("viewer").unwrap(), OrganizationRole::Viewer);
        assert!(OrganizationRole::from_str("superuser").is_err());
    }

    #[test]
    fn scope_parses_lowercase() {
        assert_eq!(RoleScope::from_str("system").unwrap(), RoleScope::System);
        assert_eq!(RoleScope::Organization.to_string(), "organization");
    }
}
