use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::ClassifyQueryRequest;

/// POST /classify_query - pass the query to the classifier and return its answer as-is
pub async fn classify_query(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyQueryRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let classification = state.classifier.classify_user_query(&request.query).await?;
    Ok(Json(classification))
}
