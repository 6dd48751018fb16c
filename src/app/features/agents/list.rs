use axum::{extract::State, Json};

use super::AgentResponse;
use crate::app::{
    authz::{permissions::ReadAgents, Authorized},
    error::AppError,
    repositories, AppState,
};

/// GET /api/v1/agents — Agents of the caller's organization, newest first.
pub async fn list_agents(
    auth: Authorized<ReadAgents>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AgentResponse>>, AppError> {
    let mut uow = state.unit_of_work();
    let agents = repositories::agents::list(&mut uow, &auth.organization_id).await?;
    Ok(Json(agents.into_iter().map(AgentResponse::from).collect()))
}
