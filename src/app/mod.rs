use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;

use crate::app::authz::{PermissionGate, RoleResolver};
use crate::app::config::Config;
use crate::app::identity::IdentityVerifier;
use crate::app::unit_of_work::{AtomicOrchestrator, UnitOfWork};

/// Human-readable application name, used in logs and the health endpoint.
pub const APP_NAME: &str = "Control Tower";

/// Shared state available to all handlers via Axum's state extractor.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    pub identity: Arc<dyn IdentityVerifier>,
    pub gate: PermissionGate,
    pub orchestrator: AtomicOrchestrator,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            gate: PermissionGate::new(RoleResolver::new(db.clone())),
            orchestrator: AtomicOrchestrator::new(db.clone()),
            db,
            config,
            identity,
        }
    }

    /// Fresh unit of work for one request. Writes through it self-commit.
    pub fn unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::new(self.db.clone())
    }
}

/// API routes, one router per feature.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(features::health::routes())
        .merge(features::organizations::routes())
        .merge(features::agents::routes())
        .merge(features::workflows::routes())
        .merge(features::roles::routes())
}

pub mod authz;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod features;
pub mod identity;
pub mod repositories;
pub mod tenant;
pub mod unit_of_work;
