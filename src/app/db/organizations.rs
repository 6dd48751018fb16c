use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{OrganizationId, OrganizationStatus, RoleName, UserId};

/// Database row for organizations table.
#[derive(Debug, Clone, FromRow)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_personal: bool,
    pub status: String,
    pub created_at: i64,
}

/// Data structure for inserting a new organization.
pub struct NewOrganization {
    pub id: OrganizationId,
    pub name: String,
    pub description: Option<String>,
    pub is_personal: bool,
}

/// Database row for organization_members table.
#[derive(Debug, Clone, FromRow)]
pub struct Member {
    pub organization_id: String,
    pub user_id: String,
    pub role: String,
    pub created_at: i64,
}

/// An organization joined with the caller's role in it.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_personal: bool,
    pub status: String,
    pub role: String,
    pub created_at: i64,
}

/// Find an organization by ID.
pub async fn find_by_id<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
) -> Result<Option<Organization>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Organization>(
        "SELECT id, name, description, is_personal, status, created_at FROM organizations WHERE id = ?",
    )
    .bind(organization_id.as_str())
    .fetch_optional(executor)
    .await
}

/// Find an organization by its unique name.
pub async fn find_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Organization>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Organization>(
        "SELECT id, name, description, is_personal, status, created_at FROM organizations WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(executor)
    .await
}

/// Insert a new organization.
pub async fn insert<'e, E>(
    executor: E,
    organization: &NewOrganization,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO organizations (id, name, description, is_personal, status, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(organization.id.as_str())
    .bind(&organization.name)
    .bind(&organization.description)
    .bind(organization.is_personal)
    .bind(OrganizationStatus::Active.to_string())
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Add a user to an organization with a specific role.
pub async fn add_member<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    user_id: &UserId,
    role: &RoleName,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO organization_members (organization_id, user_id, role, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(organization_id.as_str())
    .bind(user_id.as_str())
    .bind(role.as_str())
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Remove a membership. Returns whether a row was deleted.
pub async fn remove_member<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    user_id: &UserId,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "DELETE FROM organization_members WHERE organization_id = ? AND user_id = ?",
    )
    .bind(organization_id.as_str())
    .bind(user_id.as_str())
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Find a member's role name in an organization. Returns None if not a member.
pub async fn find_member_role<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    user_id: &UserId,
) -> Result<Option<String>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar(
        "SELECT role FROM organization_members WHERE organization_id = ? AND user_id = ?",
    )
    .bind(organization_id.as_str())
    .bind(user_id.as_str())
    .fetch_optional(executor)
    .await
}

/// All members of an organization, oldest first.
pub async fn list_members<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
) -> Result<Vec<Member>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Member>(
        "SELECT organization_id, user_id, role, created_at FROM organization_members WHERE organization_id = ? ORDER BY created_at, user_id",
    )
    .bind(organization_id.as_str())
    .fetch_all(executor)
    .await
}

/// Active organizations the user belongs to, with the user's role.
pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: &UserId,
) -> Result<Vec<MembershipSummary>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, MembershipSummary>(
        r#"
        SELECT o.id, o.name, o.description, o.is_personal, o.status, m.role, o.created_at
        FROM organizations o
        JOIN organization_members m ON m.organization_id = o.id
        WHERE m.user_id = ? AND o.status = 'active'
        ORDER BY o.created_at, o.id
        "#,
    )
    .bind(user_id.as_str())
    .fetch_all(executor)
    .await
}
