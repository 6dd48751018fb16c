pub mod create;
pub mod effective;
pub mod list;

use axum::{routing::get, Router};
use serde::Serialize;

use crate::app::{db, domain::PermissionBundle, error::AppError, AppState};

/// Role definition as returned by the API.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub canonical_name: String,
    pub description: Option<String>,
    pub status: String,
    pub scope: String,
    pub organization_id: Option<String>,
    pub permissions: PermissionBundle,
    pub created_at: i64,
}

impl TryFrom<db::SecurityRole> for RoleResponse {
    type Error = AppError;

    fn try_from(row: db::SecurityRole) -> Result<Self, Self::Error> {
        let permissions = PermissionBundle::from_json(&row.permissions).map_err(|e| {
            AppError::Internal(format!("permissions of role {} are malformed: {}", row.id, e))
        })?;
        Ok(Self {
            id: row.id,
            name: row.name,
            canonical_name: row.canonical_name,
            description: row.description,
            status: row.status,
            scope: row.scope,
            organization_id: row.organization_id,
            permissions,
            created_at: row.created_at,
        })
    }
}

/// Role and permission API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/roles", get(list::list_roles).post(create::create_role))
        .route("/api/v1/permissions", get(effective::effective_permissions))
}
