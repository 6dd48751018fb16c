use super::identifier::{check_identifier, IdentifierError};

/// Organization ID domain type. Opaque tenant identifier; newly created
/// organizations get a ULID, but ids minted elsewhere (e.g. `dev-org-001`) are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrganizationId(String);

impl OrganizationId {
    /// Generate a new random ULID-backed id.
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Parse from an untrusted string (header, path, body).
    pub fn from_string(s: &str) -> Result<Self, IdentifierError> {
        check_identifier(s).map(|s| Self(s.to_string()))
    }

    /// Get as str for storage/display.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OrganizationId {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<String> for OrganizationId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_string(&value)
    }
}

impl From<OrganizationId> for String {
    fn from(id: OrganizationId) -> Self {
        id.0
    }
}

impl std::fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_ulids() {
        let a = OrganizationId::new();
        let b = OrganizationId::new();
        assert_ne!(a, b);
        assert!(ulid::Ulid::from_string(a.as_str()).is_ok());
    }

    #[test]
    fn accepts_externally_minted_ids() {
        let id = OrganizationId::from_string("dev-org-001").unwrap();
        assert_eq!(id.as_str(), "dev-org-001");
    }

    #[test]
    fn rejects_blank_and_spaced_ids() {
        assert!(OrganizationId::from_string("").is_err());
        assert!(OrganizationId::from_string("org 1").is_err());
    }
}
