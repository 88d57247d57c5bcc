use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use provider_cell::router::provider_routes;
use security_cell::router::security_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Bookline API is running!" }))
        .nest("/providers", provider_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/security", security_routes(state.clone()))
}
