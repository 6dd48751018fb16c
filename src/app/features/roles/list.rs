use axum::{extract::State, Json};

use super::RoleResponse;
use crate::app::{
    authz::{permissions::ReadRoles, Authorized},
    error::AppError,
    repositories, AppState,
};

/// GET /api/v1/roles — System roles plus the organization's own.
pub async fn list_roles(
    auth: Authorized<ReadRoles>,
    State(state): State<AppState>,
) -> Result<Json<Vec<RoleResponse>>, AppError> {
    let mut uow = state.unit_of_work();
    let roles = repositories::security_roles::list_visible(&mut uow, &auth.organization_id).await?;
    let response = roles
        .into_iter()
        .map(RoleResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(response))
}
