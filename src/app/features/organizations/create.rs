use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;

use super::{list::OrganizationResponse, service};
use crate::app::{
    authz::Authenticated,
    db::NewOrganization,
    domain::{OrganizationId, OrganizationRole},
    error::AppError,
    repositories,
    unit_of_work::step,
    AppState,
};

/// Request body for creating an organization.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// POST /api/v1/organizations — Create an organization owned by the caller.
/// The organization and the owner membership are written in one atomic unit.
pub async fn create_organization(
    Authenticated(user_id): Authenticated,
    State(state): State<AppState>,
    Json(request): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<OrganizationResponse>), AppError> {
    request
        .validate()
        .map_err(|_| AppError::InvalidData("Invalid input".to_string()))?;

    let organization = NewOrganization {
        id: OrganizationId::new(),
        name: request.name.trim().to_string(),
        description: request.description,
        is_personal: false,
    };
    let organization_id = organization.id.clone();
    let owner_org = organization_id.clone();
    let owner = user_id.clone();

    state
        .orchestrator
        .execute_atomic(vec![
            step(move |uow| {
                Box::pin(async move { service::create_organization(uow, &organization, None).await })
            }),
            step(move |uow| {
                Box::pin(async move { service::add_owner(uow, &owner_org, &owner, None).await })
            }),
        ])
        .await?;

    let mut uow = state.unit_of_work();
    let created = repositories::organizations::find_by_id(&mut uow, &organization_id)
        .await?
        .ok_or_else(|| AppError::Internal("created organization not readable".to_string()))?;
    tracing::info!(%organization_id, %user_id, "organization created");

    Ok((
        StatusCode::CREATED,
        Json(OrganizationResponse {
            id: created.id,
            name: created.name,
            description: created.description,
            is_personal: created.is_personal,
            status: created.status,
            role: OrganizationRole::Owner.to_string(),
            created_at: created.created_at,
        }),
    ))
}
