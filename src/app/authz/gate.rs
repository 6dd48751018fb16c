use crate::app::domain::{OrganizationId, UserId};
use crate::app::error::AppError;

use super::RoleResolver;

/// Single authorization entry point. Side-effect free: one membership lookup
/// and one bundle lookup per call.
#[derive(Clone)]
pub struct PermissionGate {
    resolver: RoleResolver,
}

impl PermissionGate {
    pub fn new(resolver: RoleResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &RoleResolver {
        &self.resolver
    }

    /// Allow `user_id` to perform `action` on `resource` in the organization,
    /// or say why not.
    pub async fn authorize(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
        resource: &str,
        action: &str,
    ) -> Result<UserId, AppError> {
        let Some(membership) = self.resolver.resolve_role(user_id, organization_id).await? else {
            tracing::warn!(
                user_id = %user_id,
                organization_id = %organization_id,
                resource,
                action,
                "access denied: no membership"
            );
            return Err(AppError::NoMembership {
                organization_id: organization_id.clone(),
            });
        };

        let bundle = self
            .resolver
            .permissions_in(&membership.role, organization_id)
            .await?;

        if !bundle.allows(resource, action) {
            tracing::warn!(
                user_id = %user_id,
                organization_id = %organization_id,
                role = %membership.role,
                resource,
                action,
                "access denied: insufficient permission"
            );
            return Err(AppError::InsufficientPermission {
                role: membership.role,
                resource: resource.to_string(),
                action: action.to_string(),
            });
        }

        tracing::info!(
            user_id = %user_id,
            organization_id = %organization_id,
            role = %membership.role,
            resource,
            action,
            "access granted"
        );
        Ok(membership.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::db::{self, NewOrganization, NewSecurityRole};
    use crate::app::domain::{PermissionBundle, RoleName};
    use crate::app::error::ErrorKind;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    async fn setup() -> (SqlitePool, OrganizationId) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        let org = OrganizationId::from_string("org-1").unwrap();
        db::organizations::insert(
            &pool,
            &NewOrganization {
                id: org.clone(),
                name: "Org One".into(),
                description: None,
                is_personal: false,
            },
        )
        .await
        .unwrap();
        db::security_roles::insert(
            &pool,
            &NewSecurityRole {
                id: ulid::Ulid::new().to_string(),
                name: "VIEWER".into(),
                canonical_name: RoleName::new("VIEWER").unwrap(),
                description: None,
                organization_id: None,
                permissions: PermissionBundle::new().with("workflows", &["read"]),
            },
        )
        .await
        .unwrap();
        (pool, org)
    }

    #[tokio::test]
    async fn viewer_may_read_but_not_create() {
        let (pool, org) = setup().await;
        let user = UserId::from_string("user-1").unwrap();
        db::organizations::add_member(&pool, &org, &user, &RoleName::new("viewer").unwrap())
            .await
            .unwrap();
        let gate = PermissionGate::new(RoleResolver::new(pool));

        let allowed = gate.authorize(&user, &org, "workflows", "read").await.unwrap();
        assert_eq!(allowed, user);

        let err = gate
            .authorize(&user, &org, "workflows", "create")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientPermission);
        assert!(matches!(
            err,
            AppError::InsufficientPermission { ref role, .. } if role.as_str() == "viewer"
        ));
    }

    #[tokio::test]
    async fn non_member_is_denied_for_everything() {
        let (pool, org) = setup().await;
        let gate = PermissionGate::new(RoleResolver::new(pool));
        let stranger = UserId::from_string("stranger").unwrap();

        for (resource, action) in [("workflows", "read"), ("agents", "delete"), ("roles", "create")] {
            let err = gate
                .authorize(&stranger, &org, resource, action)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NoMembership);
        }
    }
}
