use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::{
    authz::TenantMember,
    domain::{OrganizationId, PermissionBundle, RoleName, UserId},
    error::AppError,
    AppState,
};

/// The caller's resolved permissions in the request's organization.
#[derive(Debug, Serialize)]
pub struct EffectivePermissionsResponse {
    pub user_id: UserId,
    pub organization_id: OrganizationId,
    pub role: RoleName,
    pub permissions: PermissionBundle,
}

/// GET /api/v1/permissions — Any member may read their own permissions.
pub async fn effective_permissions(
    TenantMember(membership): TenantMember,
    State(state): State<AppState>,
) -> Result<Json<EffectivePermissionsResponse>, AppError> {
    let permissions = state
        .gate
        .resolver()
        .permissions_in(&membership.role, &membership.organization_id)
        .await?;
    Ok(Json(EffectivePermissionsResponse {
        user_id: membership.user_id,
        organization_id: membership.organization_id,
        role: membership.role,
        permissions,
    }))
}
