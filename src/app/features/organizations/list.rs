use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::{authz::Authenticated, db, error::AppError, repositories, AppState};

/// An organization with the caller's role in it.
#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_personal: bool,
    pub status: String,
    pub role: String,
    pub created_at: i64,
}

impl From<db::MembershipSummary> for OrganizationResponse {
    fn from(row: db::MembershipSummary) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            is_personal: row.is_personal,
            status: row.status,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

/// GET /api/v1/organizations — Active organizations the caller belongs to.
pub async fn list_organizations(
    Authenticated(user_id): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrganizationResponse>>, AppError> {
    let mut uow = state.unit_of_work();
    let organizations = repositories::organizations::list_for_user(&mut uow, &user_id).await?;
    Ok(Json(
        organizations
            .into_iter()
            .map(OrganizationResponse::from)
            .collect(),
    ))
}
