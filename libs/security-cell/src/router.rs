// libs/security-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers;

/// The rate limit check is called before credentials are verified, so it is
/// deliberately unauthenticated.
pub fn security_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/rate-limit/check", post(handlers::check_rate_limit))
        .with_state(state)
}
