use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::service;
use crate::app::{
    authz::{
        permissions::{CreateMembers, DeleteMembers, ReadMembers},
        Authorized,
    },
    db,
    domain::{RoleName, UserId},
    error::AppError,
    repositories, AppState,
};

/// One membership of the organization.
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub user_id: String,
    pub role: String,
    pub created_at: i64,
}

impl From<db::Member> for MemberResponse {
    fn from(row: db::Member) -> Self {
        Self {
            user_id: row.user_id,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

/// Request body for adding a member.
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    #[validate(length(min = 1, max = 64))]
    pub user_id: String,
    #[validate(length(min = 1, max = 100))]
    pub role: String,
}

/// GET /api/v1/organizations/members — Members of the request's organization.
pub async fn list_members(
    auth: Authorized<ReadMembers>,
    State(state): State<AppState>,
) -> Result<Json<Vec<MemberResponse>>, AppError> {
    let mut uow = state.unit_of_work();
    let members = repositories::organizations::list_members(&mut uow, &auth.organization_id).await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// POST /api/v1/organizations/members — Add a member with a known role.
pub async fn add_member(
    auth: Authorized<CreateMembers>,
    State(state): State<AppState>,
    Json(request): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), AppError> {
    request
        .validate()
        .map_err(|_| AppError::InvalidData("Invalid input".to_string()))?;
    let user_id = UserId::from_string(request.user_id.trim())
        .map_err(|_| AppError::InvalidData("Invalid user_id".to_string()))?;
    let role = RoleName::new(&request.role)
        .map_err(|e| AppError::InvalidData(format!("Invalid role: {}", e)))?;

    let mut uow = state.unit_of_work();
    service::add_member(&mut uow, &auth.organization_id, &user_id, &role, None).await?;

    let members = repositories::organizations::list_members(&mut uow, &auth.organization_id).await?;
    let member = members
        .into_iter()
        .find(|m| m.user_id == user_id.as_str())
        .ok_or_else(|| AppError::Internal("added member not readable".to_string()))?;
    Ok((StatusCode::CREATED, Json(member.into())))
}

/// DELETE /api/v1/organizations/members/:user_id — Remove a member other than the owner.
pub async fn remove_member(
    auth: Authorized<DeleteMembers>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user_id = UserId::from_string(&user_id)
        .map_err(|_| AppError::NotFound("Member not found".to_string()))?;
    let mut uow = state.unit_of_work();
    service::remove_member(&mut uow, &auth.organization_id, &user_id, None).await?;
    Ok(StatusCode::NO_CONTENT)
}
