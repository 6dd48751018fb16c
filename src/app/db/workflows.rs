use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::OrganizationId;

/// Database row for workflows table. `nodes` and `edges` hold JSON arrays.
#[derive(Debug, Clone, FromRow)]
pub struct Workflow {
    pub id: String,
    pub organization_id: String,
    pub agent_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub nodes: String,
    pub edges: String,
    pub status: String,
    pub is_default: bool,
    pub execution_order: i64,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Data structure for inserting a new workflow.
pub struct NewWorkflow {
    pub id: String,
    pub organization_id: OrganizationId,
    pub agent_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub nodes: String,
    pub edges: String,
    pub is_default: bool,
    pub execution_order: i64,
}

const COLUMNS: &str = "id, organization_id, agent_id, name, description, nodes, edges, status, is_default, execution_order, created_at, updated_at";

/// Insert a new workflow in draft status.
pub async fn insert<'e, E>(executor: E, workflow: &NewWorkflow) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO workflows (id, organization_id, agent_id, name, description, nodes, edges, status, is_default, execution_order, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, 'draft', ?, ?, ?)",
    )
    .bind(&workflow.id)
    .bind(workflow.organization_id.as_str())
    .bind(&workflow.agent_id)
    .bind(&workflow.name)
    .bind(&workflow.description)
    .bind(&workflow.nodes)
    .bind(&workflow.edges)
    .bind(workflow.is_default)
    .bind(workflow.execution_order)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Primary-key lookup.
pub async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<Workflow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Workflow>(&format!("SELECT {COLUMNS} FROM workflows WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Lookup that compares the canonical (uppercase ULID) form of the id.
pub async fn find_by_canonical_id<'e, E>(
    executor: E,
    id: &str,
) -> Result<Option<Workflow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Workflow>(&format!(
        "SELECT {COLUMNS} FROM workflows WHERE upper(id) = upper(?) LIMIT 1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Find a workflow by name within an organization.
pub async fn find_by_name<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    name: &str,
) -> Result<Option<Workflow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Workflow>(&format!(
        "SELECT {COLUMNS} FROM workflows WHERE organization_id = ? AND name = ?"
    ))
    .bind(organization_id.as_str())
    .bind(name)
    .fetch_optional(executor)
    .await
}

/// All workflows in an organization, in execution order.
pub async fn list_by_organization<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
) -> Result<Vec<Workflow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Workflow>(&format!(
        "SELECT {COLUMNS} FROM workflows WHERE organization_id = ? ORDER BY execution_order, created_at, id"
    ))
    .bind(organization_id.as_str())
    .fetch_all(executor)
    .await
}

/// Workflows attached to an agent.
pub async fn list_by_agent<'e, E>(executor: E, agent_id: &str) -> Result<Vec<Workflow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Workflow>(&format!(
        "SELECT {COLUMNS} FROM workflows WHERE agent_id = ? ORDER BY execution_order, id"
    ))
    .bind(agent_id)
    .fetch_all(executor)
    .await
}

/// Delete every workflow attached to an agent. Returns the number deleted.
pub async fn delete_by_agent<'e, E>(executor: E, agent_id: &str) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM workflows WHERE agent_id = ?")
        .bind(agent_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
