use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{OrganizationId, PermissionBundle, RoleName, RoleScope};

/// Database row for security_roles table.
#[derive(Debug, Clone, FromRow)]
pub struct SecurityRole {
    pub id: String,
    pub name: String,
    pub canonical_name: String,
    pub description: Option<String>,
    pub status: String,
    pub scope: String,
    pub organization_id: Option<String>,
    /// JSON object: resource -> array of actions.
    pub permissions: String,
    pub created_at: i64,
}

/// Data structure for inserting a new role definition.
pub struct NewSecurityRole {
    pub id: String,
    /// Name as the author wrote it, for display.
    pub name: String,
    pub canonical_name: RoleName,
    pub description: Option<String>,
    /// `None` for a system role.
    pub organization_id: Option<OrganizationId>,
    pub permissions: PermissionBundle,
}

const COLUMNS: &str =
    "id, name, canonical_name, description, status, scope, organization_id, permissions, created_at";

/// Insert a role. Scope follows from whether an organization is given.
pub async fn insert<'e, E>(executor: E, role: &NewSecurityRole) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let scope = match role.organization_id {
        Some(_) => RoleScope::Organization,
        None => RoleScope::System,
    };
    sqlx::query(
        "INSERT INTO security_roles (id, name, canonical_name, description, status, scope, organization_id, permissions, created_at) VALUES (?, ?, ?, ?, 'active', ?, ?, ?, ?)",
    )
    .bind(&role.id)
    .bind(&role.name)
    .bind(role.canonical_name.as_str())
    .bind(&role.description)
    .bind(scope.to_string())
    .bind(role.organization_id.as_ref().map(|id| id.as_str()))
    .bind(role.permissions.to_json())
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Find the active system role with this canonical name.
pub async fn find_system_role<'e, E>(
    executor: E,
    canonical_name: &RoleName,
) -> Result<Option<SecurityRole>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, SecurityRole>(&format!(
        "SELECT {COLUMNS} FROM security_roles WHERE canonical_name = ? AND organization_id IS NULL AND status = 'active'"
    ))
    .bind(canonical_name.as_str())
    .fetch_optional(executor)
    .await
}

/// Find a role of this canonical name defined by the organization, any status.
pub async fn find_in_organization<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    canonical_name: &RoleName,
) -> Result<Option<SecurityRole>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, SecurityRole>(&format!(
        "SELECT {COLUMNS} FROM security_roles WHERE organization_id = ? AND canonical_name = ?"
    ))
    .bind(organization_id.as_str())
    .bind(canonical_name.as_str())
    .fetch_optional(executor)
    .await
}

/// Permission JSON of every active role that applies to `canonical_name`
/// inside `organization_id`: the system role and that organization's own role.
/// Roles of other organizations never match. At most two rows.
pub async fn applicable_permissions<'e, E>(
    executor: E,
    canonical_name: &RoleName,
    organization_id: &OrganizationId,
) -> Result<Vec<String>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar(
        r#"
        SELECT permissions FROM security_roles
        WHERE canonical_name = ?
          AND status = 'active'
          AND (organization_id IS NULL OR organization_id = ?)
        ORDER BY scope DESC
        "#,
    )
    .bind(canonical_name.as_str())
    .bind(organization_id.as_str())
    .fetch_all(executor)
    .await
}

/// System roles plus the organization's own roles, system first.
pub async fn list_visible<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
) -> Result<Vec<SecurityRole>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, SecurityRole>(&format!(
        "SELECT {COLUMNS} FROM security_roles WHERE organization_id IS NULL OR organization_id = ? ORDER BY scope DESC, canonical_name"
    ))
    .bind(organization_id.as_str())
    .fetch_all(executor)
    .await
}

/// Whether any active role, system or the organization's own, carries this name.
pub async fn exists_for<'e, E>(
    executor: E,
    canonical_name: &RoleName,
    organization_id: &OrganizationId,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM security_roles WHERE canonical_name = ? AND status = 'active' AND (organization_id IS NULL OR organization_id = ?)",
    )
    .bind(canonical_name.as_str())
    .bind(organization_id.as_str())
    .fetch_one(executor)
    .await?;
    Ok(count > 0)
}
