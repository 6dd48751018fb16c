use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use validator::Validate;

use super::{service, AgentResponse};
use crate::app::{
    authz::{permissions::CreateAgents, Authorized},
    db::NewAgent,
    error::AppError,
    features::workflows::service::{create_workflow, WorkflowDraft},
    repositories,
    unit_of_work::step,
    AppState,
};

fn default_true() -> bool {
    true
}

/// Request body for creating an agent.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAgentRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub preview_enabled: bool,
    /// Also create the agent's default workflow, in the same atomic unit.
    #[serde(default = "default_true")]
    pub create_default_workflow: bool,
}

/// Response for a created agent.
#[derive(Debug, Serialize)]
pub struct CreateAgentResponse {
    #[serde(flatten)]
    pub agent: AgentResponse,
    pub default_workflow_id: Option<String>,
}

/// POST /api/v1/agents — Create an agent and, by default, its default workflow.
/// Both rows are written in one atomic unit: either both exist afterwards or neither does.
pub async fn create_agent(
    auth: Authorized<CreateAgents>,
    State(state): State<AppState>,
    Json(request): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<CreateAgentResponse>), AppError> {
    request
        .validate()
        .map_err(|_| AppError::InvalidData("Invalid input".to_string()))?;

    let agent = NewAgent {
        id: Ulid::new().to_string(),
        organization_id: auth.organization_id.clone(),
        name: request.name.trim().to_string(),
        description: request.description,
        enabled: request.enabled,
        preview_enabled: request.preview_enabled,
    };
    let agent_id = agent.id.clone();

    let default_workflow_id = if request.create_default_workflow {
        let draft = WorkflowDraft::default_for_agent(&agent.id, &agent.name);
        let organization_id = auth.organization_id.clone();
        let workflow_id = state
            .orchestrator
            .execute_atomic(vec![
                step(move |uow| Box::pin(async move { service::create_agent(uow, &agent, None).await })),
                step(move |uow| {
                    Box::pin(async move { create_workflow(uow, &organization_id, &draft, None).await })
                }),
            ])
            .await?;
        Some(workflow_id)
    } else {
        let mut uow = state.unit_of_work();
        service::create_agent(&mut uow, &agent, None).await?;
        None
    };

    let mut uow = state.unit_of_work();
    let created = repositories::agents::find_in_organization(&mut uow, &auth.organization_id, &agent_id)
        .await?
        .ok_or_else(|| AppError::Internal("created agent not readable".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAgentResponse {
            agent: created.into(),
            default_workflow_id,
        }),
    ))
}
