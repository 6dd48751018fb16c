use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use super::{IdentityError, IdentityVerifier};
use crate::app::domain::UserId;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Verifies tokens with the authentication service's `/auth/userid` endpoint.
pub struct AuthServiceVerifier {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct UserIdResponse {
    #[serde(default)]
    valid: bool,
    user: Option<VerifiedUser>,
}

#[derive(Debug, Deserialize)]
struct VerifiedUser {
    id: String,
}

impl AuthServiceVerifier {
    pub fn new(base_url: &str) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IdentityError::Config(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/auth/userid", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait::async_trait]
impl IdentityVerifier for AuthServiceVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, IdentityError> {
        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to reach identity service");
                IdentityError::Unavailable(e.to_string())
            })?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(IdentityError::Rejected);
        }
        if !response.status().is_success() {
            tracing::error!(status = %response.status(), "identity service returned error");
            return Err(IdentityError::Rejected);
        }

        let body: UserIdResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "unreadable identity service response");
            IdentityError::Rejected
        })?;

        match body {
            UserIdResponse {
                valid: true,
                user: Some(user),
            } => UserId::from_string(&user.id).map_err(|_| IdentityError::Rejected),
            _ => Err(IdentityError::Rejected),
        }
    }
}
