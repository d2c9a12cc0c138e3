pub mod health;
pub mod query;

use axum::{
    routing::{get, post},
    Router,
};

use crate::sessions::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless pipeline
        .route("/api/v1/query", post(query::handle_query))
        // Sessions API
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/refresh",
            post(handlers::handle_refresh),
        )
        .route(
            "/api/v1/sessions/:id/criteria",
            get(handlers::handle_get_criteria).put(handlers::handle_put_criteria),
        )
        .route(
            "/api/v1/sessions/:id/saved/:job_id",
            post(handlers::handle_toggle_saved),
        )
        .route(
            "/api/v1/sessions/:id/types/:job_type",
            post(handlers::handle_toggle_type),
        )
        .route(
            "/api/v1/sessions/:id/jobs/:job_id",
            get(handlers::handle_get_job),
        )
        .with_state(state)
}
