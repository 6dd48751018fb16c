use std::collections::HashMap;

use super::{IdentityError, IdentityVerifier};
use crate::app::domain::UserId;

/// Fixed token -> subject table. For development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, UserId>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, user_id: UserId) -> Self {
        self.tokens.insert(token.into(), user_id);
        self
    }

    /// Parse `token=user,token=user`.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let mut verifier = Self::new();
        for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (token, user) = pair
                .split_once('=')
                .ok_or_else(|| IdentityError::Config(format!("malformed token entry: {}", pair)))?;
            let user_id = UserId::from_string(user.trim())
                .map_err(|e| IdentityError::Config(format!("invalid user id for token: {}", e)))?;
            verifier = verifier.with_token(token.trim(), user_id);
        }
        Ok(verifier)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait::async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, IdentityError> {
        self.tokens.get(token).cloned().ok_or(IdentityError::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_token_yields_subject() {
        let verifier = StaticTokenVerifier::parse("tok-a=user-a, tok-b=user-b").unwrap();
        assert_eq!(verifier.len(), 2);
        let user = verifier.verify("tok-b").await.unwrap();
        assert_eq!(user.as_str(), "user-b");
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let verifier = StaticTokenVerifier::new();
        assert!(matches!(
            verifier.verify("nope").await,
            Err(IdentityError::Rejected)
        ));
    }

    #[test]
    fn malformed_entry_is_a_config_error() {
        assert!(matches!(
            StaticTokenVerifier::parse("just-a-token"),
            Err(IdentityError::Config(_))
        ));
    }
}
