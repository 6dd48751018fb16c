#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use controltower::app::config::Config;
use controltower::app::db::{self, NewOrganization};
use controltower::app::domain::{OrganizationId, RoleName, UserId};
use controltower::app::identity::StaticTokenVerifier;
use controltower::app::AppState;
use controltower::{create_router, seeds};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ORG_ID: &str = "org-1";
pub const OTHER_ORG_ID: &str = "org-2";

pub const OWNER: (&str, &str) = ("owner-token", "owner-1");
pub const ADMIN: (&str, &str) = ("admin-token", "admin-1");
pub const MEMBER: (&str, &str) = ("member-token", "member-1");
pub const VIEWER: (&str, &str) = ("viewer-token", "viewer-1");
pub const STRANGER: (&str, &str) = ("stranger-token", "stranger-1");

/// In-memory database with migrations and system roles. One connection, so
/// concurrent units of work queue for it instead of sharing it.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    seeds::run_seeds(&pool).await.unwrap();
    pool
}

/// `sqlite://` URL for a database file inside `dir`.
pub fn database_url(dir: &TempDir) -> String {
    format!("sqlite://{}", dir.path().join("controltower.db").display())
}

/// Pool over a WAL database file, configured the way the server configures it
/// apart from the busy timeout.
pub async fn connect_file(url: &str, max_connections: u32, busy_timeout: Duration) -> SqlitePool {
    let options = db::connect_options(url).unwrap().busy_timeout(busy_timeout);
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .unwrap()
}

/// File-backed database with migrations and system roles, where several
/// connections really run side by side. Keep the directory alive with the pool.
pub async fn file_pool(max_connections: u32) -> (SqlitePool, TempDir) {
    let dir = TempDir::new().unwrap();
    let pool = connect_file(&database_url(&dir), max_connections, db::BUSY_TIMEOUT).await;
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    seeds::run_seeds(&pool).await.unwrap();
    (pool, dir)
}

pub fn test_verifier() -> StaticTokenVerifier {
    [OWNER, ADMIN, MEMBER, VIEWER, STRANGER]
        .into_iter()
        .fold(StaticTokenVerifier::new(), |verifier, (token, user)| {
            verifier.with_token(token, UserId::from_string(user).unwrap())
        })
}

pub fn test_state(pool: SqlitePool) -> AppState {
    AppState::new(pool, Config::for_tests(), Arc::new(test_verifier()))
}

pub fn test_router(pool: SqlitePool) -> axum::Router {
    create_router(test_state(pool))
}

pub async fn create_org(pool: &SqlitePool, id: &str) -> OrganizationId {
    let id = OrganizationId::from_string(id).unwrap();
    db::organizations::insert(
        pool,
        &NewOrganization {
            id: id.clone(),
            name: format!("Organization {}", id),
            description: None,
            is_personal: false,
        },
    )
    .await
    .unwrap();
    id
}

pub async fn add_member(pool: &SqlitePool, organization_id: &str, user_id: &str, role: &str) {
    db::organizations::add_member(
        pool,
        &OrganizationId::from_string(organization_id).unwrap(),
        &UserId::from_string(user_id).unwrap(),
        &RoleName::new(role).unwrap(),
    )
    .await
    .unwrap();
}

/// `org-1` with an owner, an admin, a member and a viewer; `org-2` where only
/// the viewer is a member, as owner.
pub async fn setup_orgs() -> (SqlitePool, axum::Router) {
    let pool = test_pool().await;
    create_org(&pool, ORG_ID).await;
    create_org(&pool, OTHER_ORG_ID).await;
    add_member(&pool, ORG_ID, OWNER.1, "owner").await;
    add_member(&pool, ORG_ID, ADMIN.1, "admin").await;
    add_member(&pool, ORG_ID, MEMBER.1, "member").await;
    add_member(&pool, ORG_ID, VIEWER.1, "viewer").await;
    add_member(&pool, OTHER_ORG_ID, VIEWER.1, "owner").await;
    let app = test_router(pool.clone());
    (pool, app)
}

/// JSON API request with optional bearer token, tenant header and body.
pub fn api_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    organization_id: Option<&str>,
    body: Option<Value>,
) -> http::Request<Body> {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    if let Some(organization_id) = organization_id {
        builder = builder.header("x-organization-id", organization_id);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request; returns the status and the JSON body (`Null` when empty).
pub async fn send(app: &axum::Router, request: http::Request<Body>) -> (http::StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, body)
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}
