pub mod create;
pub mod list;
pub mod members;
pub mod service;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::app::AppState;

/// Organization and membership API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/organizations",
            get(list::list_organizations).post(create::create_organization),
        )
        .route(
            "/api/v1/organizations/members",
            get(members::list_members).post(members::add_member),
        )
        .route(
            "/api/v1/organizations/members/:user_id",
            delete(members::remove_member),
        )
}
