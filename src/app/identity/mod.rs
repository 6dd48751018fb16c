//! Caller identity. Tokens are verified by an external service; this crate
//! only sees the opaque subject it returns.

use std::sync::Arc;

use crate::app::domain::UserId;
use crate::app::error::AppError;

/// Abstract interface for verifying a bearer credential. Swappable per environment.
#[async_trait::async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<UserId, IdentityError>;
}

/// Errors that can occur while verifying a credential.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("credential rejected")]
    Rejected,
    #[error("identity service unreachable: {0}")]
    Unavailable(String),
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Rejected => AppError::Unauthenticated,
            IdentityError::Unavailable(detail) => AppError::IdentityUnavailable(detail),
            IdentityError::Config(detail) => AppError::Internal(detail),
        }
    }
}

pub use auth_service::AuthServiceVerifier;
pub use static_tokens::StaticTokenVerifier;

mod auth_service;
mod static_tokens;

/// Build the identity verifier from config.
pub fn from_config(
    config: &crate::app::config::Config,
) -> Result<Arc<dyn IdentityVerifier>, IdentityError> {
    match config.identity_adapter.as_str() {
        "auth_service" => Ok(Arc::new(AuthServiceVerifier::new(&config.auth_service_url)?)),
        "static" => {
            let verifier = StaticTokenVerifier::parse(config.static_tokens.as_deref().unwrap_or(""))?;
            tracing::warn!(tokens = verifier.len(), "using static identity tokens");
            Ok(Arc::new(verifier))
        }
        _ => Err(IdentityError::Config(format!(
            "Unknown IDENTITY_ADAPTER: {}",
            config.identity_adapter
        ))),
    }
}
