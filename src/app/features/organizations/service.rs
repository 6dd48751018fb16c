use crate::app::db::NewOrganization;
use crate::app::domain::{OrganizationId, OrganizationRole, RoleName, UserId};
use crate::app::error::AppError;
use crate::app::repositories;
use crate::app::unit_of_work::{CommitPolicy, UnitOfWork};

/// Create an organization; names are globally unique.
pub async fn create_organization(
    uow: &mut UnitOfWork,
    organization: &NewOrganization,
    policy: Option<CommitPolicy>,
) -> Result<(), AppError> {
    if repositories::organizations::find_by_name(uow, &organization.name)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Organization with name '{}' already exists",
            organization.name
        )));
    }
    repositories::organizations::create(uow, organization, policy).await
}

/// Make `user_id` the owner of a freshly created organization.
pub async fn add_owner(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
    user_id: &UserId,
    policy: Option<CommitPolicy>,
) -> Result<(), AppError> {
    let owner = RoleName::from(OrganizationRole::Owner);
    repositories::organizations::add_member(uow, organization_id, user_id, &owner, policy).await
}

/// Add a member with a role known in the organization.
pub async fn add_member(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
    user_id: &UserId,
    role: &RoleName,
    policy: Option<CommitPolicy>,
) -> Result<(), AppError> {
    if !repositories::security_roles::is_assignable(uow, organization_id, role).await? {
        return Err(AppError::InvalidData(format!("Unknown role '{}'", role)));
    }
    if repositories::organizations::find_member_role(uow, organization_id, user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "User {} is already a member of this organization",
            user_id
        )));
    }
    repositories::organizations::add_member(uow, organization_id, user_id, role, policy).await?;
    tracing::info!(%organization_id, %user_id, %role, "member added");
    Ok(())
}

/// Remove a member. The owner cannot be removed.
pub async fn remove_member(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
    user_id: &UserId,
    policy: Option<CommitPolicy>,
) -> Result<(), AppError> {
    let role = repositories::organizations::find_member_role(uow, organization_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;
    if role.is_owner() {
        return Err(AppError::Conflict(
            "The organization owner cannot be removed".to_string(),
        ));
    }
    repositories::organizations::remove_member(uow, organization_id, user_id, policy).await?;
    tracing::info!(%organization_id, %user_id, "member removed");
    Ok(())
}
