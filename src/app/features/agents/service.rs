use crate::app::db::NewAgent;
use crate::app::error::AppError;
use crate::app::repositories;
use crate::app::unit_of_work::{CommitPolicy, UnitOfWork};

/// Create an agent; names are unique per organization. Returns the id.
pub async fn create_agent(
    uow: &mut UnitOfWork,
    agent: &NewAgent,
    policy: Option<CommitPolicy>,
) -> Result<String, AppError> {
    if repositories::agents::find_by_name(uow, &agent.organization_id, &agent.name)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Agent with name '{}' already exists",
            agent.name
        )));
    }
    repositories::agents::create(uow, agent, policy).await?;
    tracing::info!(agent_id = %agent.id, organization_id = %agent.organization_id, "agent created");
    Ok(agent.id.clone())
}

/// Delete an agent and every workflow attached to it. Returns whether the agent existed.
pub async fn delete_agent(
    uow: &mut UnitOfWork,
    agent_id: &str,
    policy: Option<CommitPolicy>,
) -> Result<bool, AppError> {
    let removed = repositories::workflows::delete_for_agent(uow, agent_id, policy).await?;
    let existed = repositories::agents::delete(uow, agent_id, policy).await?;
    tracing::info!(agent_id, workflows = removed, existed, "agent deleted");
    Ok(existed)
}
