//! API Handlers
//!
//! HTTP request handlers for the cache administration endpoints.

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode, Uri},
    Json,
};

use crate::cache::{Cache, CacheStats};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::manager::{CacheManager, HealthReport, WarmUpReport};
use crate::models::{DataResponse, MessageResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub manager: CacheManager,
}

impl AppState {
    pub fn new(manager: CacheManager) -> Self {
        Self { manager }
    }

    /// Creates a fresh cache sized from configuration, with no warmers.
    ///
    /// The background sweep is not started here.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheManager::new(Cache::from_config(config)))
    }
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<DataResponse<CacheStats>> {
    Json(DataResponse::ok(state.manager.get_cache_stats().await))
}

/// Handler for GET /cache/keys
pub async fn keys_handler(State(state): State<AppState>) -> Json<DataResponse<Vec<String>>> {
    Json(DataResponse::ok(state.manager.get_cache_keys().await))
}

/// Handler for GET /cache/health
///
/// 200 when healthy, 503 otherwise; the report is returned either way.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<DataResponse<HealthReport>>) {
    let report = state.manager.cache_health_check().await;
    let status = if report.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(DataResponse::with_status(report.healthy, report)))
}

/// Handler for DELETE /cache/clear
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    let result = state.manager.clear_all_cache().await;
    Json(MessageResponse::new(result.message))
}

/// Handler for DELETE /cache/clear/pattern/:pattern
pub async fn clear_pattern_handler(
    State(state): State<AppState>,
    Path(pattern): Path<String>,
) -> Result<Json<MessageResponse>> {
    let pattern = required(pattern, "Pattern parameter is required")?;
    let result = state.manager.clear_cache_pattern(&pattern).await;
    Ok(Json(MessageResponse::new(result.message)))
}

/// Handler for DELETE /cache/clear/movie/:movie_id
pub async fn clear_movie_handler(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let movie_id = required(movie_id, "Movie ID parameter is required")?;
    let result = state.manager.clear_movie_cache(movie_id).await;
    Ok(Json(MessageResponse::new(result.message)))
}

/// Handler for DELETE /cache/clear/review/:review_id
pub async fn clear_review_handler(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let review_id = required(review_id, "Review ID parameter is required")?;
    let result = state.manager.clear_review_cache(review_id).await;
    Ok(Json(MessageResponse::new(result.message)))
}

/// Handler for POST /cache/warmup
pub async fn warmup_handler(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    match state.manager.warm_up_cache().await {
        WarmUpReport::Warmed { message } => Ok(Json(MessageResponse::new(message))),
        WarmUpReport::Failed { error, details } => Err(ApiError::WarmUpFailed { error, details }),
    }
}

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

fn required(value: String, message: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidRequest(message.to_string()));
    }
    Ok(value)
}
