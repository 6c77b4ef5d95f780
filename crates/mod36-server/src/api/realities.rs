//! Realities catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use mod36_flows::Reality;

use super::errors::ApiError;
use crate::AppState;

/// Handler for `GET /v1/realities`
pub async fn list_realities_handler(State(state): State<AppState>) -> Json<Vec<Reality>> {
    Json(state.realities.all().to_vec())
}

/// Handler for `GET /v1/realities/:id`
pub async fn get_reality_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Reality>, ApiError> {
    state
        .realities
        .find(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Reality '{}' not found", id)))
}
