use super::{
    handlers::{analyze, approve, health},
    middleware::{logging::logging_middleware, request_id::request_id_middleware},
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tower_http::services::{ServeDir, ServeFile};

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    let static_dir = state.config.production.then(|| state.config.static_dir.clone());

    let router = Router::new()
        // Health
        .route("/api/health", get(health::health_check))
        // Analysis
        .route("/api/analyze", post(analyze::analyze))
        .route("/api/analyze/upload", post(analyze::analyze_upload))
        .route("/api/analyze/base64", post(analyze::analyze_base64))
        .route("/api/analyze/approve", post(approve::approve));

    // Production serves the prebuilt browser bundle, falling back to
    // index.html for client-side routes.
    let router = match static_dir {
        Some(dir) => {
            let index = dir.join("index.html");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router,
    };

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
