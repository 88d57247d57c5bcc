// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    Appointment, AppointmentError, BookAppointmentRequest, ListAppointmentsQuery,
    UpdateStatusRequest,
};
use crate::services::booking::BookingService;
use crate::services::lifecycle::LifecycleRules;

fn map_appointment_error(err: AppointmentError) -> AppError {
    match err {
        AppointmentError::InvalidRange
        | AppointmentError::PastBooking
        | AppointmentError::TooFarInFuture
        | AppointmentError::InvalidProvider => AppError::BadRequest(err.to_string()),
        AppointmentError::OverlapConflict => AppError::Conflict(err.to_string()),
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::Forbidden => AppError::Forbidden(err.to_string()),
        AppointmentError::DatabaseError(msg) => AppError::Database(msg),
    }
}

/// Non-admin callers only ever see their own appointments, whatever
/// filters they ask for.
fn scope_query(user: &User, mut query: ListAppointmentsQuery) -> ListAppointmentsQuery {
    if user.is_admin() {
        return query;
    }
    let own_id = Uuid::parse_str(&user.id).ok();
    if user.is_staff() {
        query.provider_id = own_id;
        query.customer_id = None;
    } else {
        query.customer_id = own_id;
        query.provider_id = None;
    }
    query
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    LifecycleRules::authorize_booking(&user, &request.customer_id)
        .map_err(map_appointment_error)?;

    let service = BookingService::new(&state);
    let appointment = service
        .book_appointment(&request, auth.token())
        .await
        .map_err(map_appointment_error)?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    let query = scope_query(&user, query);

    let appointments = service
        .list_appointments(&query, auth.token())
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Appointment>, AppError> {
    let service = BookingService::new(&state);
    let appointment = service
        .get_appointment(appointment_id, auth.token())
        .await
        .map_err(map_appointment_error)?;

    // Reuse the delete rule for visibility: the same three parties that may
    // remove a booking may read it.
    if LifecycleRules::authorize_delete(&user, &appointment).is_err() {
        return Err(AppError::Forbidden(
            "Not authorized to view this appointment".to_string(),
        ));
    }

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let service = BookingService::new(&state);

    let current = service
        .get_appointment(appointment_id, auth.token())
        .await
        .map_err(map_appointment_error)?;
    LifecycleRules::authorize_status_change(&user, &current).map_err(map_appointment_error)?;

    let updated = service
        .update_status(appointment_id, request.status, auth.token())
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);

    let current = service
        .get_appointment(appointment_id, auth.token())
        .await
        .map_err(map_appointment_error)?;
    LifecycleRules::authorize_delete(&user, &current).map_err(map_appointment_error)?;

    service
        .delete_appointment(appointment_id, auth.token())
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "deleted": appointment_id })))
}
