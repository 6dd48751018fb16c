/// Maximum length of a role name.
pub const MAX_ROLE_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleNameError {
    #[error("role name must not be empty")]
    Empty,
    #[error("role name exceeds {} characters", MAX_ROLE_NAME_LEN)]
    TooLong,
    #[error("role name may only contain letters, digits, '-' and '_'")]
    InvalidChar,
}

/// Canonical role name. Normalized once (trimmed, lowercase) so that
/// `OWNER`, `Owner` and `owner` address the same role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    /// Normalize and validate a role name.
    pub fn new(raw: &str) -> Result<Self, RoleNameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RoleNameError::Empty);
        }
        if trimmed.chars().count() > MAX_ROLE_NAME_LEN {
            return Err(RoleNameError::TooLong);
        }
        if !trimmed
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(RoleNameError::InvalidChar);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The owner role is protected from removal.
    pub fn is_owner(&self) -> bool {
        self.0 == super::OrganizationRole::Owner.to_string()
    }
}

impl TryFrom<String> for RoleName {
    type Error = RoleNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<RoleName> for String {
    fn from(name: RoleName) -> Self {
        name.0
    }
}

impl From<super::OrganizationRole> for RoleName {
    fn from(role: super::OrganizationRole) -> Self {
        Self(role.to_string())
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
