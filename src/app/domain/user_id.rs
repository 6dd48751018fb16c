use super::identifier::{check_identifier, IdentifierError};

/// User ID domain type. The subject identifier returned by the identity
/// service; its format is owned by that service, so it is kept opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Parse from string.
    pub fn from_string(s: &str) -> Result<Self, IdentifierError> {
        check_identifier(s).map(|s| Self(s.to_string()))
    }

    /// Get as str for storage/display.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_string(&value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_uuid_subject() {
        let id = UserId::from_string("3f2b8c1e-9d7a-4c55-8f0e-2a1b3c4d5e6f").unwrap();
        assert_eq!(id.as_str(), "3f2b8c1e-9d7a-4c55-8f0e-2a1b3c4d5e6f");
    }

    #[test]
    fn parse_invalid_subject() {
        assert!(UserId::from_string("   ").is_err());
        assert!(UserId::from_string("a/b").is_err());
    }
}
