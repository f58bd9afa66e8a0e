pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod types;

use axum::{
    http::Uri,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::middleware::{api_key_middleware, jwt_auth_middleware};
pub use crate::state::AppState;

/// Compose the full HTTP surface. Guards are attached per route group.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .merge(classify_routes())
        // Protected (JWT)
        .nest("/landing-page", landing_page_routes(&state))
        .nest("/sitemap", sitemap_routes(&state))
        .fallback(not_found)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn landing_page_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected::landing_page;

    require_jwt(
        Router::new().route("/jurisdictions", get(landing_page::jurisdictions)),
        state,
    )
}

fn sitemap_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected::sitemap;

    require_jwt(Router::new().route("/urls", get(sitemap::urls)), state)
}

fn classify_routes() -> Router<AppState> {
    Router::new().route("/classify_query", post(handlers::public::classify_query))
}

/// Gate every route currently in `router` behind a valid bearer JWT.
///
/// Uses `route_layer`, so unknown paths still fall through to 404.
pub fn require_jwt(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router.route_layer(from_fn_with_state(state.jwt.clone(), jwt_auth_middleware))
}

/// Gate every route currently in `router` behind the static `X-API-Key`.
///
/// Combine with [`require_jwt`] to require both; the guard applied last runs first.
pub fn require_api_key(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router.route_layer(from_fn_with_state(state.api_key.clone(), api_key_middleware))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
