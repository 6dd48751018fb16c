/// Maximum length of an externally supplied identifier.
pub const MAX_IDENTIFIER_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("identifier must not be empty")]
    Empty,
    #[error("identifier exceeds {} characters", MAX_IDENTIFIER_LEN)]
    TooLong,
    #[error("identifier contains invalid character {0:?}")]
    InvalidChar(char),
}

/// Check an opaque identifier: non-empty, bounded, ASCII alphanumerics plus `-`, `_`, `.`.
pub fn check_identifier(s: &str) -> Result<&str, IdentifierError> {
    if s.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if s.len() > MAX_IDENTIFIER_LEN {
        return Err(IdentifierError::TooLong);
    }
    if let Some(c) = s
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(IdentifierError::InvalidChar(c));
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_enforced() {
        assert_eq!(check_identifier(""), Err(IdentifierError::Empty));
        assert_eq!(
            check_identifier(&"a".repeat(MAX_IDENTIFIER_LEN + 1)),
            Err(IdentifierError::TooLong)
        );
        assert!(check_identifier(&"a".repeat(MAX_IDENTIFIER_LEN)).is_ok());
        assert_eq!(check_identifier("a b"), Err(IdentifierError::InvalidChar(' ')));
    }
}
