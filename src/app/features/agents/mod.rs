pub mod create;
pub mod delete;
pub mod list;
pub mod service;
pub mod show;

use axum::{routing::get, Router};
use serde::Serialize;

use crate::app::{db, AppState};

/// Agent as returned by the API.
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub preview_enabled: bool,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl From<db::Agent> for AgentResponse {
    fn from(row: db::Agent) -> Self {
        Self {
            id: row.id,
            organization_id: row.organization_id,
            name: row.name,
            description: row.description,
            enabled: row.enabled,
            preview_enabled: row.preview_enabled,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Agent API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/agents",
            get(list::list_agents).post(create::create_agent),
        )
        .route(
            "/api/v1/agents/:id",
            get(show::show_agent).delete(delete::delete_agent),
        )
}
