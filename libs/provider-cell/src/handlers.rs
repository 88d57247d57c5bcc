// libs/provider-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::NaiveDate;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{AvailabilityResponse, ProviderError, SetAvailabilityRequest, Weekday};
use crate::services::availability::AvailabilityService;
use crate::services::slots;

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

fn map_provider_error(err: ProviderError) -> AppError {
    match err {
        ProviderError::NotFound => AppError::NotFound("Provider not found".to_string()),
        ProviderError::InvalidWindow(msg) => AppError::BadRequest(msg),
        ProviderError::DatabaseError(msg) => AppError::Database(msg),
    }
}

/// Availability mutations are reserved to the owning provider (or an admin
/// acting on their behalf). Reads are open to any authenticated user.
fn ensure_owner_or_admin(user: &User, provider_id: Uuid) -> Result<(), AppError> {
    let is_owner = user.id == provider_id.to_string();
    if !is_owner && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to manage this provider's availability".to_string(),
        ));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(_user): Extension<User>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let service = AvailabilityService::new(&state);

    let schedule = service
        .get_schedule(provider_id, auth.token())
        .await
        .map_err(map_provider_error)?;

    Ok(Json(AvailabilityResponse::from_schedule(&schedule)))
}

#[axum::debug_handler]
pub async fn set_availability(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<SetAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    ensure_owner_or_admin(&user, provider_id)?;

    let service = AvailabilityService::new(&state);

    service
        .set_window(provider_id, request, auth.token())
        .await
        .map_err(map_provider_error)?;

    Ok(Json(json!({ "ok": true })))
}

#[axum::debug_handler]
pub async fn clear_availability(
    State(state): State<Arc<AppConfig>>,
    Path((provider_id, day)): Path<(Uuid, Weekday)>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    ensure_owner_or_admin(&user, provider_id)?;

    let service = AvailabilityService::new(&state);

    service
        .clear_window(provider_id, day, auth.token())
        .await
        .map_err(map_provider_error)?;

    Ok(Json(json!({ "ok": true })))
}

/// Candidate slots for a calendar date. Advisory only: the conflict-safe
/// writer re-decides freedom at commit time.
#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);

    let schedule = service
        .get_schedule(provider_id, auth.token())
        .await
        .map_err(map_provider_error)?;

    let slots = slots::slots_for_date(&schedule, query.date);

    Ok(Json(json!({ "slots": slots })))
}
