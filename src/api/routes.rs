//! API Routes
//!
//! Configures the Axum router with the cache administration endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_all_handler, clear_movie_handler, clear_pattern_handler, clear_review_handler,
    health_handler, keys_handler, method_not_allowed, stats_handler, warmup_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /cache/stats` - Cache statistics
/// - `GET /cache/keys` - Raw key list
/// - `GET /cache/health` - Health check (200 healthy, 503 unhealthy)
/// - `DELETE /cache/clear` - Clear everything
/// - `DELETE /cache/clear/pattern/:pattern` - Clear keys matching a `*` pattern
/// - `DELETE /cache/clear/movie/:movie_id` - Clear entries tied to a movie
/// - `DELETE /cache/clear/review/:review_id` - Clear entries tied to a review
/// - `POST /cache/warmup` - Run the registered warmers
///
/// Any other method on these paths answers 405.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache/stats", get(stats_handler).fallback(method_not_allowed))
        .route("/cache/keys", get(keys_handler).fallback(method_not_allowed))
        .route("/cache/health", get(health_handler).fallback(method_not_allowed))
        .route("/cache/clear", delete(clear_all_handler).fallback(method_not_allowed))
        .route(
            "/cache/clear/pattern/:pattern",
            delete(clear_pattern_handler).fallback(method_not_allowed),
        )
        .route(
            "/cache/clear/movie/:movie_id",
            delete(clear_movie_handler).fallback(method_not_allowed),
        )
        .route(
            "/cache/clear/review/:review_id",
            delete(clear_review_handler).fallback(method_not_allowed),
        )
        .route("/cache/warmup", post(warmup_handler).fallback(method_not_allowed))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
