use sqlx::SqlitePool;

use crate::app::db;
use crate::app::domain::{OrganizationId, PermissionBundle, RoleName, UserId};
use crate::app::error::AppError;

/// A caller's role inside one organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub user_id: UserId,
    pub organization_id: OrganizationId,
    pub role: RoleName,
}

/// Looks up memberships and role bundles. Runs on the pool, never inside a unit of work.
#[derive(Clone)]
pub struct RoleResolver {
    pool: SqlitePool,
}

impl RoleResolver {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The caller's membership in the organization, or None.
    pub async fn resolve_role(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<Option<Membership>, AppError> {
        let Some(raw) =
            db::organizations::find_member_role(&self.pool, organization_id, user_id).await?
        else {
            return Ok(None);
        };
        let role = RoleName::new(&raw)
            .map_err(|e| AppError::Internal(format!("stored role {:?} is invalid: {}", raw, e)))?;
        Ok(Some(Membership {
            user_id: user_id.clone(),
            organization_id: organization_id.clone(),
            role,
        }))
    }

    /// Bundle of the system role with this name. Unknown or inactive roles
    /// yield an empty bundle, which denies everything.
    pub async fn permissions_for(&self, role: &RoleName) -> Result<PermissionBundle, AppError> {
        match db::security_roles::find_system_role(&self.pool, role).await? {
            Some(found) => parse_bundle(&found.permissions, role),
            None => {
                tracing::debug!(%role, "no system role with this name");
                Ok(PermissionBundle::new())
            }
        }
    }

    /// Union of the system role and the organization's own role of this name.
    pub async fn permissions_in(
        &self,
        role: &RoleName,
        organization_id: &OrganizationId,
    ) -> Result<PermissionBundle, AppError> {
        let rows =
            db::security_roles::applicable_permissions(&self.pool, role, organization_id).await?;
        let mut bundle = PermissionBundle::new();
        for raw in &rows {
            bundle.merge(parse_bundle(raw, role)?);
        }
        Ok(bundle)
    }

    /// Everything the caller may do in the organization; empty for non-members.
    pub async fn effective_permissions(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<PermissionBundle, AppError> {
        match self.resolve_role(user_id, organization_id).await? {
            Some(membership) => self.permissions_in(&membership.role, organization_id).await,
            None => Ok(PermissionBundle::new()),
        }
    }
}

fn parse_bundle(raw: &str, role: &RoleName) -> Result<PermissionBundle, AppError> {
    PermissionBundle::from_json(raw).map_err(|e| {
        AppError::Internal(format!("permissions of role {} are malformed: {}", role, e))
    })
}
