use crate::app::db::{self, NewWorkflow, Workflow};
use crate::app::domain::OrganizationId;
use crate::app::error::AppError;
use crate::app::unit_of_work::{CommitPolicy, UnitOfWork};

pub async fn create(
    uow: &mut UnitOfWork,
    workflow: &NewWorkflow,
    policy: Option<CommitPolicy>,
) -> Result<(), AppError> {
    let policy = uow.resolve_policy(policy);
    let conn = uow.connection().await?;
    let result = db::workflows::insert(conn, workflow).await.map_err(AppError::from);
    tracing::debug!(workflow_id = %workflow.id, ?policy, ok = result.is_ok(), "workflow insert");
    uow.settle(policy, result).await
}

/// Delete the workflows attached to an agent. Returns how many were removed.
pub async fn delete_for_agent(
    uow: &mut UnitOfWork,
    agent_id: &str,
    policy: Option<CommitPolicy>,
) -> Result<u64, AppError> {
    let policy = uow.resolve_policy(policy);
    let conn = uow.connection().await?;
    let result = db::workflows::delete_by_agent(conn, agent_id)
        .await
        .map_err(AppError::from);
    uow.settle(policy, result).await
}

/// Lookup by id; see [`super::agents::find_by_id`] for the in-unit fallback.
pub async fn find_by_id(uow: &mut UnitOfWork, id: &str) -> Result<Option<Workflow>, AppError> {
    let in_unit = uow.context().is_active();
    let mut reader = uow.reader().await?;
    if let Some(workflow) = db::workflows::find_by_id(&mut *reader, id).await? {
        return Ok(Some(workflow));
    }
    if !in_unit {
        return Ok(None);
    }
    tracing::debug!(workflow_id = id, "workflow lookup missed inside atomic unit; retrying by canonical id");
    Ok(db::workflows::find_by_canonical_id(&mut *reader, id).await?)
}

pub async fn find_by_name(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
    name: &str,
) -> Result<Option<Workflow>, AppError> {
    let mut reader = uow.reader().await?;
    Ok(db::workflows::find_by_name(&mut *reader, organization_id, name).await?)
}

pub async fn list(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
) -> Result<Vec<Workflow>, AppError> {
    let mut reader = uow.reader().await?;
    Ok(db::workflows::list_by_organization(&mut *reader, organization_id).await?)
}

pub async fn list_for_agent(
    uow: &mut UnitOfWork,
    agent_id: &str,
) -> Result<Vec<Workflow>, AppError> {
    let mut reader = uow.reader().await?;
    Ok(db::workflows::list_by_agent(&mut *reader, agent_id).await?)
}
