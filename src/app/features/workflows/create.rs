use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;
use ulid::Ulid;
use validator::Validate;

use super::service::{self, WorkflowDraft};
use super::WorkflowResponse;
use crate::app::{
    authz::{permissions::CreateWorkflows, Authorized},
    error::AppError,
    repositories, AppState,
};

/// Request body for creating a workflow.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkflowRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub agent_id: Option<String>,
    pub nodes: Option<Vec<Value>>,
    pub edges: Option<Vec<Value>>,
    #[validate(range(min = 1))]
    pub execution_order: Option<i64>,
}

/// POST /api/v1/workflows — Create a workflow. A single self-committing write.
pub async fn create_workflow(
    auth: Authorized<CreateWorkflows>,
    State(state): State<AppState>,
    Json(request): Json<CreateWorkflowRequest>,
) -> Result<(StatusCode, Json<WorkflowResponse>), AppError> {
    request
        .validate()
        .map_err(|_| AppError::InvalidData("Invalid input".to_string()))?;

    let mut uow = state.unit_of_work();

    if let Some(agent_id) = &request.agent_id {
        repositories::agents::find_in_organization(&mut uow, &auth.organization_id, agent_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Agent not found".to_string()))?;
    }

    let draft = WorkflowDraft {
        id: Ulid::new().to_string(),
        name: request.name.trim().to_string(),
        description: request.description,
        agent_id: request.agent_id,
        nodes: request.nodes,
        edges: request.edges,
        is_default: false,
        execution_order: request.execution_order.unwrap_or(1),
    };
    let workflow_id = service::create_workflow(&mut uow, &auth.organization_id, &draft, None).await?;

    let workflow = repositories::workflows::find_by_id(&mut uow, &workflow_id)
        .await?
        .ok_or_else(|| AppError::Internal("created workflow not readable".to_string()))?;

    Ok((StatusCode::CREATED, Json(workflow.try_into()?)))
}
