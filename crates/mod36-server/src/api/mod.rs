//! API routes for the Mod36 server

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod errors;
pub mod flows;
pub mod health;
pub mod realities;

use crate::AppState;

/// Build the router for API endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Flows
        .route("/v1/flows/poeticize-text", post(flows::poeticize_text_handler))
        .route("/v1/flows/reality-insight", post(flows::reality_insight_handler))

        // Realities catalog
        .route("/v1/realities", get(realities::list_realities_handler))
        .route("/v1/realities/:id", get(realities::get_reality_handler))

        // Health check
        .route("/health", get(health::health_check))

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
