use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::AgentResponse;
use crate::app::{
    authz::{permissions::ReadAgents, Authorized},
    error::AppError,
    features::workflows::WorkflowResponse,
    repositories, AppState,
};

/// An agent with its workflows.
#[derive(Debug, Serialize)]
pub struct AgentDetailResponse {
    #[serde(flatten)]
    pub agent: AgentResponse,
    pub workflows: Vec<WorkflowResponse>,
}

/// GET /api/v1/agents/:id — One agent of the caller's organization.
pub async fn show_agent(
    auth: Authorized<ReadAgents>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AgentDetailResponse>, AppError> {
    let mut uow = state.unit_of_work();
    let agent = repositories::agents::find_in_organization(&mut uow, &auth.organization_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Agent not found".to_string()))?;
    let workflows = repositories::workflows::list_for_agent(&mut uow, &agent.id)
        .await?
        .into_iter()
        .map(WorkflowResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(AgentDetailResponse {
        agent: agent.into(),
        workflows,
    }))
}
