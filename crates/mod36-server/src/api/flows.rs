//! Flow endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use mod36_flows::{
    GenerateRealityInsightInput, GenerateRealityInsightOutput, PoeticizeTextInput,
    PoeticizeTextOutput,
};

use super::errors::ApiError;
use crate::AppState;

/// Handler for `POST /v1/flows/poeticize-text`
pub async fn poeticize_text_handler(
    State(state): State<AppState>,
    payload: Result<Json<PoeticizeTextInput>, JsonRejection>,
) -> Result<Json<PoeticizeTextOutput>, ApiError> {
    let Json(input) = payload?;
    let output = state.flows.poeticize_text(&input).await?;
    Ok(Json(output))
}

/// Handler for `POST /v1/flows/reality-insight`
pub async fn reality_insight_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRealityInsightInput>, JsonRejection>,
) -> Result<Json<GenerateRealityInsightOutput>, ApiError> {
    let Json(input) = payload?;
    let output = state.flows.generate_reality_insight(&input).await?;
    Ok(Json(output))
}
