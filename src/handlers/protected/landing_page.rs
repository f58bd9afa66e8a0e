use axum::{extract::State, response::Json};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::types::JurisdictionSummary;

/// GET /landing-page/jurisdictions - every jurisdiction with its has_data flag
pub async fn jurisdictions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<JurisdictionSummary>>, ApiError> {
    let jurisdictions = state.landing_page.get_jurisdictions().await?;
    tracing::debug!("Listed {} jurisdictions for '{}'", jurisdictions.len(), user.sub);
    Ok(Json(jurisdictions))
}
