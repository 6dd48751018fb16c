use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::app::{error::AppError, AppState, APP_NAME};

/// GET /health — Liveness plus a database round trip.
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    sqlx::query("SELECT 1").execute(&state.db).await?;
    Ok(Json(json!({ "status": "ok", "service": APP_NAME })))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
