use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use sqlx::error::ErrorKind as SqlxErrorKind;
use sqlx::Error as SqlxError;

use crate::app::domain::{OrganizationId, RoleName};

/// SQLite primary result codes. Extended codes carry these in their low byte.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_TOOBIG: i32 = 18;
const SQLITE_MISMATCH: i32 = 20;
const SQLITE_RANGE: i32 = 25;

/// Failure classes surfaced to callers. Every [`AppError`] maps to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthenticated,
    NoMembership,
    InsufficientPermission,
    NotFound,
    Conflict,
    IntegrityViolation,
    InvalidData,
    Unexpected,
}

/// Application error type for unified error handling across the app.
#[derive(Debug)]
pub enum AppError {
    /// No verified identity (401).
    Unauthenticated,

    /// Identity service unreachable (503).
    IdentityUnavailable(String),

    /// Caller has no role in the organization (403).
    NoMembership { organization_id: OrganizationId },

    /// Caller's role lacks the action on the resource (403).
    InsufficientPermission {
        role: RoleName,
        resource: String,
        action: String,
    },

    /// Tenant-scoped lookup found nothing (404). Also used where revealing existence would leak.
    NotFound(String),

    /// Service-level uniqueness or protection rule, checked before writing (409).
    Conflict(String),

    /// Store rejected a write on a constraint (409). Detail is logged, never returned.
    IntegrityViolation(String),

    /// Malformed or out-of-range input (400).
    InvalidData(String),

    /// Unclassified database errors (500).
    Database(SqlxError),

    /// Generic internal errors (500). Detail is logged, never returned.
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthenticated => ErrorKind::Unauthenticated,
            AppError::NoMembership { .. } => ErrorKind::NoMembership,
            AppError::InsufficientPermission { .. } => ErrorKind::InsufficientPermission,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::IntegrityViolation(_) => ErrorKind::IntegrityViolation,
            AppError::InvalidData(_) => ErrorKind::InvalidData,
            AppError::IdentityUnavailable(_) | AppError::Database(_) | AppError::Internal(_) => {
                ErrorKind::Unexpected
            }
        }
    }

    /// Re-run classification on raw database errors. Idempotent for everything else.
    pub fn classified(self) -> Self {
        match self {
            AppError::Database(err) => classify_sqlx(err),
            other => other,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::IdentityUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NoMembership { .. } | AppError::InsufficientPermission { .. } => {
                StatusCode::FORBIDDEN
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::IntegrityViolation(_) => StatusCode::CONFLICT,
            AppError::InvalidData(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the caller.
    fn public_message(&self) -> String {
        match self {
            AppError::Unauthenticated => "Unauthorized".to_string(),
            AppError::IdentityUnavailable(_) => "Authentication service unavailable".to_string(),
            AppError::NoMembership { organization_id } => {
                format!("User is not a member of organization {}", organization_id)
            }
            AppError::InsufficientPermission {
                role,
                resource,
                action,
            } => format!(
                "User with role '{}' does not have '{}' permission for '{}'",
                role, action, resource
            ),
            AppError::NotFound(msg) | AppError::Conflict(msg) | AppError::InvalidData(msg) => {
                msg.clone()
            }
            AppError::IntegrityViolation(_) => "Operation violates database constraints".to_string(),
            AppError::Database(_) | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::IdentityUnavailable(detail) | AppError::Internal(detail) => {
                write!(f, "{}: {}", self.public_message(), detail)
            }
            AppError::IntegrityViolation(detail) => write!(f, "integrity violation: {}", detail),
            AppError::Database(err) => write!(f, "database error: {}", err),
            other => f.write_str(&other.public_message()),
        }
    }
}

impl std::error::Error for AppError {}

fn primary_code(db_err: &dyn sqlx::error::DatabaseError) -> Option<i32> {
    db_err
        .code()
        .and_then(|code| code.parse::<i32>().ok())
        .map(|code| code & 0xff)
}

/// Sort a raw `sqlx` error into the taxonomy.
fn classify_sqlx(err: SqlxError) -> AppError {
    let kind = match &err {
        SqlxError::Database(db_err) => match (db_err.kind(), primary_code(db_err.as_ref())) {
            (
                SqlxErrorKind::UniqueViolation
                | SqlxErrorKind::ForeignKeyViolation
                | SqlxErrorKind::NotNullViolation
                | SqlxErrorKind::CheckViolation,
                _,
            ) => ErrorKind::IntegrityViolation,
            (_, Some(SQLITE_BUSY | SQLITE_LOCKED)) => ErrorKind::Conflict,
            (_, Some(SQLITE_TOOBIG | SQLITE_MISMATCH | SQLITE_RANGE)) => ErrorKind::InvalidData,
            _ => ErrorKind::Unexpected,
        },
        SqlxError::ColumnDecode { .. } | SqlxError::Decode(_) => ErrorKind::InvalidData,
        _ => ErrorKind::Unexpected,
    };

    match kind {
        ErrorKind::IntegrityViolation => AppError::IntegrityViolation(err.to_string()),
        ErrorKind::Conflict => {
            tracing::warn!(%err, "write lock still held after busy timeout");
            AppError::Conflict("Resource is busy, retry the operation".to_string())
        }
        ErrorKind::InvalidData => {
            tracing::debug!(%err, "store rejected malformed data");
            AppError::InvalidData("Invalid data provided".to_string())
        }
        _ => AppError::Database(err),
    }
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        classify_sqlx(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        match &self {
            AppError::Database(err) => tracing::error!(%err, "database error"),
            AppError::Internal(detail) => tracing::error!(%detail, "internal error"),
            AppError::IdentityUnavailable(detail) => {
                tracing::error!(%detail, "identity service unavailable")
            }
            AppError::IntegrityViolation(detail) => {
                tracing::warn!(%detail, "constraint violation")
            }
            _ => {}
        }

        let body = Json(json!({
            "error": self.public_message(),
            "kind": kind,
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_one_kind() {
        let org = OrganizationId::from_string("org-1").unwrap();
        assert_eq!(
            AppError::NoMembership { organization_id: org }.kind(),
            ErrorKind::NoMembership
        );
        assert_eq!(AppError::Internal("boom".into()).kind(), ErrorKind::Unexpected);
        assert_eq!(
            AppError::IdentityUnavailable("down".into()).kind(),
            ErrorKind::Unexpected
        );
        assert_eq!(AppError::Conflict("dup".into()).kind(), ErrorKind::Conflict);
    }

    #[test]
    fn integrity_detail_is_not_public() {
        let err = AppError::IntegrityViolation("UNIQUE constraint failed: agents.name".into());
        assert_eq!(err.public_message(), "Operation violates database constraints");
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn insufficient_permission_names_the_role() {
        let err = AppError::InsufficientPermission {
            role: RoleName::new("viewer").unwrap(),
            resource: "workflows".into(),
            action: "create".into(),
        };
        assert_eq!(
            err.public_message(),
            "User with role 'viewer' does not have 'create' permission for 'workflows'"
        );
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn non_database_sqlx_errors_stay_unexpected() {
        let err: AppError = SqlxError::PoolTimedOut.into();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        let err: AppError = SqlxError::RowNotFound.into();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }
}
