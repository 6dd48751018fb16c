use crate::app::db::{self, NewSecurityRole, SecurityRole};
use crate::app::domain::{OrganizationId, RoleName};
use crate::app::error::AppError;
use crate::app::unit_of_work::{CommitPolicy, UnitOfWork};

pub async fn create(
    uow: &mut UnitOfWork,
    role: &NewSecurityRole,
    policy: Option<CommitPolicy>,
) -> Result<(), AppError> {
    let policy = uow.resolve_policy(policy);
    let conn = uow.connection().await?;
    let result = db::security_roles::insert(conn, role).await.map_err(AppError::from);
    tracing::debug!(role = %role.canonical_name, ?policy, ok = result.is_ok(), "security role insert");
    uow.settle(policy, result).await
}

pub async fn find_in_organization(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
    canonical_name: &RoleName,
) -> Result<Option<SecurityRole>, AppError> {
    let mut reader = uow.reader().await?;
    Ok(db::security_roles::find_in_organization(&mut *reader, organization_id, canonical_name).await?)
}

/// Whether a membership may carry this role name in the organization.
pub async fn is_assignable(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
    canonical_name: &RoleName,
) -> Result<bool, AppError> {
    let mut reader = uow.reader().await?;
    Ok(db::security_roles::exists_for(&mut *reader, canonical_name, organization_id).await?)
}

pub async fn list_visible(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
) -> Result<Vec<SecurityRole>, AppError> {
    let mut reader = uow.reader().await?;
    Ok(db::security_roles::list_visible(&mut *reader, organization_id).await?)
}
