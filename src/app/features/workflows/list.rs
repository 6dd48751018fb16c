use axum::{extract::State, Json};

use super::WorkflowResponse;
use crate::app::{
    authz::{permissions::ReadWorkflows, Authorized},
    error::AppError,
    repositories, AppState,
};

/// GET /api/v1/workflows — Workflows of the caller's organization.
pub async fn list_workflows(
    auth: Authorized<ReadWorkflows>,
    State(state): State<AppState>,
) -> Result<Json<Vec<WorkflowResponse>>, AppError> {
    let mut uow = state.unit_of_work();
    let workflows = repositories::workflows::list(&mut uow, &auth.organization_id).await?;
    let response = workflows
        .into_iter()
        .map(WorkflowResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(response))
}
