use axum::{extract::State, response::Json};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /sitemap/urls - frontend URLs for every known entity
pub async fn urls(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<String>>, ApiError> {
    let urls = state.sitemap.get_all_frontend_urls().await?;
    tracing::debug!("Enumerated {} sitemap URLs for '{}'", urls.len(), user.sub);
    Ok(Json(urls))
}
