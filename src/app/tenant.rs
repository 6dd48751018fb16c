//! Tenant resolution.
//!
//! **Rule**: the tenant comes from the request, never from the caller's
//! session. Membership in it is checked by the permission gate on every call.

use axum::http::HeaderMap;

use crate::app::{config::Config, domain::OrganizationId, error::AppError};

pub const ORGANIZATION_HEADER: &str = "x-organization-id";

/// Organization the request targets. Without the header, the configured
/// fallback applies in development only.
pub fn resolve_organization(headers: &HeaderMap, config: &Config) -> Result<OrganizationId, AppError> {
    match headers.get(ORGANIZATION_HEADER) {
        Some(value) => {
            let raw = value
                .to_str()
                .map_err(|_| AppError::InvalidData("Invalid organization header".to_string()))?;
            OrganizationId::from_string(raw.trim())
                .map_err(|_| AppError::InvalidData("Invalid organization header".to_string()))
        }
        None => match config.fallback_organization() {
            Some(fallback) => {
                tracing::debug!(organization_id = %fallback, "no organization header; using development fallback");
                Ok(fallback.clone())
            }
            None => Err(AppError::InvalidData(format!(
                "Missing {} header",
                ORGANIZATION_HEADER
            ))),
        },
    }
}
