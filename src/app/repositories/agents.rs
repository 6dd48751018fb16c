use crate::app::db::{self, Agent, NewAgent};
use crate::app::domain::OrganizationId;
use crate::app::error::AppError;
use crate::app::unit_of_work::{CommitPolicy, UnitOfWork};

pub async fn create(
    uow: &mut UnitOfWork,
    agent: &NewAgent,
    policy: Option<CommitPolicy>,
) -> Result<(), AppError> {
    let policy = uow.resolve_policy(policy);
    let conn = uow.connection().await?;
    let result = db::agents::insert(conn, agent).await.map_err(AppError::from);
    tracing::debug!(agent_id = %agent.id, ?policy, ok = result.is_ok(), "agent insert");
    uow.settle(policy, result).await
}

/// Delete an agent. Returns whether it existed.
pub async fn delete(
    uow: &mut UnitOfWork,
    id: &str,
    policy: Option<CommitPolicy>,
) -> Result<bool, AppError> {
    let policy = uow.resolve_policy(policy);
    let conn = uow.connection().await?;
    let result = db::agents::delete(conn, id).await.map_err(AppError::from);
    uow.settle(policy, result).await
}

/// Lookup by id. Inside an atomic unit a primary-key miss is retried on the
/// canonical id form so rows flushed earlier in the unit are always found.
pub async fn find_by_id(uow: &mut UnitOfWork, id: &str) -> Result<Option<Agent>, AppError> {
    let in_unit = uow.context().is_active();
    let mut reader = uow.reader().await?;
    if let Some(agent) = db::agents::find_by_id(&mut *reader, id).await? {
        return Ok(Some(agent));
    }
    if !in_unit {
        return Ok(None);
    }
    tracing::debug!(agent_id = id, "agent lookup missed inside atomic unit; retrying by canonical id");
    Ok(db::agents::find_by_canonical_id(&mut *reader, id).await?)
}

/// Lookup by id restricted to one organization.
pub async fn find_in_organization(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
    id: &str,
) -> Result<Option<Agent>, AppError> {
    Ok(find_by_id(uow, id)
        .await?
        .filter(|agent| agent.organization_id == organization_id.as_str()))
}

pub async fn find_by_name(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
    name: &str,
) -> Result<Option<Agent>, AppError> {
    let mut reader = uow.reader().await?;
    Ok(db::agents::find_by_name(&mut *reader, organization_id, name).await?)
}

pub async fn list(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
) -> Result<Vec<Agent>, AppError> {
    let mut reader = uow.reader().await?;
    Ok(db::agents::list_by_organization(&mut *reader, organization_id).await?)
}
