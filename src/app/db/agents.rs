use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::OrganizationId;

/// Database row for agents table.
#[derive(Debug, Clone, FromRow)]
pub struct Agent {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub preview_enabled: bool,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Data structure for inserting a new agent.
pub struct NewAgent {
    pub id: String,
    pub organization_id: OrganizationId,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub preview_enabled: bool,
}

const COLUMNS: &str =
    "id, organization_id, name, description, enabled, preview_enabled, created_at, updated_at";

/// Insert a new agent.
pub async fn insert<'e, E>(executor: E, agent: &NewAgent) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO agents (id, organization_id, name, description, enabled, preview_enabled, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&agent.id)
    .bind(agent.organization_id.as_str())
    .bind(&agent.name)
    .bind(&agent.description)
    .bind(agent.enabled)
    .bind(agent.preview_enabled)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Primary-key lookup.
pub async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<Agent>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Agent>(&format!("SELECT {COLUMNS} FROM agents WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Lookup that compares the canonical (uppercase ULID) form of the id.
pub async fn find_by_canonical_id<'e, E>(
    executor: E,
    id: &str,
) -> Result<Option<Agent>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Agent>(&format!(
        "SELECT {COLUMNS} FROM agents WHERE upper(id) = upper(?) LIMIT 1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Find an agent by name within an organization.
pub async fn find_by_name<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    name: &str,
) -> Result<Option<Agent>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Agent>(&format!(
        "SELECT {COLUMNS} FROM agents WHERE organization_id = ? AND name = ?"
    ))
    .bind(organization_id.as_str())
    .bind(name)
    .fetch_optional(executor)
    .await
}

/// All agents in an organization, newest first.
pub async fn list_by_organization<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
) -> Result<Vec<Agent>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Agent>(&format!(
        "SELECT {COLUMNS} FROM agents WHERE organization_id = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(organization_id.as_str())
    .fetch_all(executor)
    .await
}

/// Delete an agent. Returns whether a row was deleted.
pub async fn delete<'e, E>(executor: E, id: &str) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM agents WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
