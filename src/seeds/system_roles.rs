use async_trait::async_trait;
use sqlx::SqlitePool;
use strum::IntoEnumIterator;
use ulid::Ulid;

use crate::app::db::{self, NewSecurityRole};
use crate::app::domain::{OrganizationRole, PermissionBundle, RoleName};
use crate::seeds::{Seed, SeedOutcome};

const FULL: &[&str] = &["create", "read", "update", "delete"];

/// Description and permission bundle of a built-in role.
pub fn builtin_role(role: OrganizationRole) -> (&'static str, PermissionBundle) {
    match role {
        OrganizationRole::Owner => (
            "Organization owner with full administrative privileges",
            administrator_bundle(),
        ),
        OrganizationRole::Admin => (
            "Full system administrator with all permissions",
            administrator_bundle(),
        ),
        OrganizationRole::Member | OrganizationRole::User => (
            "Standard user with basic permissions",
            PermissionBundle::new()
                .with("agents", &["read", "execute"])
                .with("llms", &["read"])
                .with("mcp-tools", &["read"])
                .with("rag", &["read"])
                .with("workflows", &["read", "execute"])
                .with("rest-apis", &["read"])
                .with("intent-data", &["read"])
                .with("metrics", &["read"])
                .with("members", &["read"]),
        ),
        OrganizationRole::Viewer => (
            "Read-only access to system resources",
            PermissionBundle::new()
                .with("agents", &["read"])
                .with("llms", &["read"])
                .with("mcp-tools", &["read"])
                .with("rag", &["read"])
                .with("workflows", &["read"])
                .with("rest-apis", &["read"])
                .with("intent-data", &["read"])
                .with("metrics", &["read"]),
        ),
    }
}

fn administrator_bundle() -> PermissionBundle {
    PermissionBundle::new()
        .with("agents", &["create", "read", "update", "delete", "execute"])
        .with("llms", &["create", "read", "update", "delete", "configure"])
        .with("mcp-tools", &["create", "read", "update", "delete", "configure"])
        .with("rag", &["create", "read", "update", "delete", "configure"])
        .with("workflows", &["create", "read", "update", "delete", "deploy"])
        .with("rest-apis", FULL)
        .with("intent-data", &["read"])
        .with("metrics", &["read", "configure"])
        .with("roles", FULL)
        .with("members", FULL)
}

/// Installs OWNER, ADMIN, MEMBER, USER and VIEWER. Existing roles are left untouched.
pub struct SystemRoles;

#[async_trait]
impl Seed for SystemRoles {
    fn version(&self) -> i64 {
        20260101000100
    }

    fn description(&self) -> &str {
        "system_roles"
    }

    async fn run(&self, pool: &SqlitePool) -> Result<SeedOutcome, sqlx::Error> {
        for role in OrganizationRole::iter() {
            let canonical_name = RoleName::from(role);
            if db::security_roles::find_system_role(pool, &canonical_name)
                .await?
                .is_some()
            {
                continue;
            }
            let (description, permissions) = builtin_role(role);
            db::security_roles::insert(
                pool,
                &NewSecurityRole {
                    id: Ulid::new().to_string(),
                    name: canonical_name.as_str().to_uppercase(),
                    canonical_name,
                    description: Some(description.to_string()),
                    organization_id: None,
                    permissions,
                },
            )
            .await?;
        }
        Ok(SeedOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administrators_manage_members_and_roles() {
        for role in [OrganizationRole::Owner, OrganizationRole::Admin] {
            let (_, bundle) = builtin_role(role);
            assert!(bundle.allows("members", "delete"));
            assert!(bundle.allows("roles", "create"));
            assert!(bundle.allows("workflows", "deploy"));
        }
    }

    #[test]
    fn viewer_is_read_only() {
        let (_, bundle) = builtin_role(OrganizationRole::Viewer);
        assert!(bundle.allows("workflows", "read"));
        assert!(!bundle.allows("workflows", "create"));
        assert!(!bundle.allows("members", "read"));
    }
}
