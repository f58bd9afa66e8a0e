use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service banner and endpoint map
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "CoLD API",
        "version": version,
        "endpoints": {
            "landing_page": "/landing-page/jurisdictions (JWT)",
            "sitemap": "/sitemap/urls (JWT)",
            "classify": "/classify_query (public)",
            "health": "/health (public)",
        }
    }))
}

/// GET /health - liveness plus which optional collaborators are wired
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let services = &state.config.services;

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "environment": state.config.environment,
        "classifier": services.classifier_url.is_some(),
        "catalog": services.catalog_path.is_some(),
    }))
}
