// src/routes.rs

use axum::{
    Router,
    routing::{any, get},
};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::{health, preview},
    state::AppState,
};

/// Assembles the main application router.
///
/// * `/api/v1/preview` and `/api/v1/content` accept every method so the
///   admission check can answer non-GET requests itself.
/// * The API is nested under `config.base_path` when one is set.
/// * Global middleware: Trace, then a per-request timeout. A timed-out or
///   abandoned request drops its handler future, storage fetches included.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/preview", any(preview::preview))
        .route("/content", any(preview::content));

    let app_routes = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes);

    let app_routes = match state.config.base_path.as_deref() {
        Some(base) => Router::new().nest(base, app_routes),
        None => app_routes,
    };

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.request_timeout));

    app_routes
        // Global Middleware (applied from outside in)
        .layer(middleware)
        .with_state(state)
}
