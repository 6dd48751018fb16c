use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use ulid::Ulid;
use validator::Validate;

use super::RoleResponse;
use crate::app::{
    authz::{permissions::CreateRoles, Authorized},
    db::NewSecurityRole,
    domain::{PermissionBundle, RoleName},
    error::AppError,
    repositories, AppState,
};

/// Request body for defining an organization role.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: PermissionBundle,
}

/// POST /api/v1/roles — Define a role that applies only in the caller's organization.
/// Its permissions are added to those of the system role with the same name.
pub async fn create_role(
    auth: Authorized<CreateRoles>,
    State(state): State<AppState>,
    Json(request): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<RoleResponse>), AppError> {
    request
        .validate()
        .map_err(|_| AppError::InvalidData("Invalid input".to_string()))?;
    let canonical_name = RoleName::new(&request.name)
        .map_err(|e| AppError::InvalidData(format!("Invalid role name: {}", e)))?;

    let mut uow = state.unit_of_work();
    if repositories::security_roles::find_in_organization(&mut uow, &auth.organization_id, &canonical_name)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Role '{}' already exists in this organization",
            canonical_name
        )));
    }

    let role = NewSecurityRole {
        id: Ulid::new().to_string(),
        name: request.name.trim().to_string(),
        canonical_name,
        description: request.description,
        organization_id: Some(auth.organization_id.clone()),
        permissions: request.permissions,
    };
    repositories::security_roles::create(&mut uow, &role, None).await?;
    tracing::info!(
        organization_id = %auth.organization_id,
        role = %role.canonical_name,
        "organization role created"
    );

    let created = repositories::security_roles::find_in_organization(
        &mut uow,
        &auth.organization_id,
        &role.canonical_name,
    )
    .await?
    .ok_or_else(|| AppError::Internal("created role not readable".to_string()))?;
    Ok((StatusCode::CREATED, Json(created.try_into()?)))
}
