pub mod create;
pub mod list;
pub mod service;

use axum::{routing::get, Router};
use serde::Serialize;
use serde_json::Value;

use crate::app::{db, error::AppError, AppState};

/// Workflow as returned by the API.
#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    pub id: String,
    pub organization_id: String,
    pub agent_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub nodes: Value,
    pub edges: Value,
    pub status: String,
    pub is_default: bool,
    pub execution_order: i64,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl TryFrom<db::Workflow> for WorkflowResponse {
    type Error = AppError;

    fn try_from(row: db::Workflow) -> Result<Self, Self::Error> {
        let parse = |raw: &str| {
            serde_json::from_str::<Value>(raw)
                .map_err(|e| AppError::Internal(format!("workflow {} graph is malformed: {}", row.id, e)))
        };
        Ok(Self {
            nodes: parse(&row.nodes)?,
            edges: parse(&row.edges)?,
            id: row.id,
            organization_id: row.organization_id,
            agent_id: row.agent_id,
            name: row.name,
            description: row.description,
            status: row.status,
            is_default: row.is_default,
            execution_order: row.execution_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Workflow API routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/v1/workflows",
        get(list::list_workflows).post(create::create_workflow),
    )
}
