use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use super::service;
use crate::app::{
    authz::{permissions::DeleteAgents, Authorized},
    error::AppError,
    repositories,
    unit_of_work::step,
    AppState,
};

/// DELETE /api/v1/agents/:id — Delete an agent together with its workflows, atomically.
pub async fn delete_agent(
    auth: Authorized<DeleteAgents>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let agent = {
        let mut uow = state.unit_of_work();
        repositories::agents::find_in_organization(&mut uow, &auth.organization_id, &id)
            .await?
            .ok_or_else(|| AppError::NotFound("Agent not found".to_string()))?
    };

    let existed = state
        .orchestrator
        .execute_atomic(vec![step(move |uow| {
            Box::pin(async move { service::delete_agent(uow, &agent.id, None).await })
        })])
        .await?;

    if !existed {
        return Err(AppError::NotFound("Agent not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
