use crate::app::db::{self, Member, MembershipSummary, NewOrganization, Organization};
use crate::app::domain::{OrganizationId, RoleName, UserId};
use crate::app::error::AppError;
use crate::app::unit_of_work::{CommitPolicy, UnitOfWork};

pub async fn create(
    uow: &mut UnitOfWork,
    organization: &NewOrganization,
    policy: Option<CommitPolicy>,
) -> Result<(), AppError> {
    let policy = uow.resolve_policy(policy);
    let conn = uow.connection().await?;
    let result = db::organizations::insert(conn, organization)
        .await
        .map_err(AppError::from);
    tracing::debug!(organization_id = %organization.id, ?policy, ok = result.is_ok(), "organization insert");
    uow.settle(policy, result).await
}

pub async fn add_member(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
    user_id: &UserId,
    role: &RoleName,
    policy: Option<CommitPolicy>,
) -> Result<(), AppError> {
    let policy = uow.resolve_policy(policy);
    let conn = uow.connection().await?;
    let result = db::organizations::add_member(conn, organization_id, user_id, role)
        .await
        .map_err(AppError::from);
    uow.settle(policy, result).await
}

/// Remove a membership. Returns whether one existed.
pub async fn remove_member(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
    user_id: &UserId,
    policy: Option<CommitPolicy>,
) -> Result<bool, AppError> {
    let policy = uow.resolve_policy(policy);
    let conn = uow.connection().await?;
    let result = db::organizations::remove_member(conn, organization_id, user_id)
        .await
        .map_err(AppError::from);
    uow.settle(policy, result).await
}

pub async fn find_by_id(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
) -> Result<Option<Organization>, AppError> {
    let mut reader = uow.reader().await?;
    Ok(db::organizations::find_by_id(&mut *reader, organization_id).await?)
}

pub async fn find_by_name(
    uow: &mut UnitOfWork,
    name: &str,
) -> Result<Option<Organization>, AppError> {
    let mut reader = uow.reader().await?;
    Ok(db::organizations::find_by_name(&mut *reader, name).await?)
}

/// The member's canonical role, or None if not a member.
pub async fn find_member_role(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
    user_id: &UserId,
) -> Result<Option<RoleName>, AppError> {
    let mut reader = uow.reader().await?;
    let raw = db::organizations::find_member_role(&mut *reader, organization_id, user_id).await?;
    raw.map(|role| {
        RoleName::new(&role)
            .map_err(|e| AppError::Internal(format!("stored role {:?} is invalid: {}", role, e)))
    })
    .transpose()
}

pub async fn list_members(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
) -> Result<Vec<Member>, AppError> {
    let mut reader = uow.reader().await?;
    Ok(db::organizations::list_members(&mut *reader, organization_id).await?)
}

pub async fn list_for_user(
    uow: &mut UnitOfWork,
    user_id: &UserId,
) -> Result<Vec<MembershipSummary>, AppError> {
    let mut reader = uow.reader().await?;
    Ok(db::organizations::list_for_user(&mut *reader, user_id).await?)
}
