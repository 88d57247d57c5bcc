// libs/security-cell/src/handlers.rs
use std::sync::Arc;

use axum::{extract::State, Json};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{RateLimitCheckRequest, RateLimitDecision};
use crate::services::rate_limit::RateLimiterService;

/// Record an attempt against the caller-supplied key and report whether it
/// is within budget. Callers gate their own action on the decision; a
/// denied check carries the seconds left in the window.
#[axum::debug_handler]
pub async fn check_rate_limit(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<RateLimitCheckRequest>,
) -> Result<Json<RateLimitDecision>, AppError> {
    if request.key.trim().is_empty() {
        return Err(AppError::BadRequest("key must not be empty".to_string()));
    }

    let limiter = RateLimiterService::new(&state);
    let decision = limiter.check(&request.key).await;

    Ok(Json(decision))
}
