use chrono::Utc;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Method,
};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use provider_cell::services::availability::AvailabilityService;
use shared_config::AppConfig;
use shared_database::PostgrestClient;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, BookAppointmentRequest,
    ListAppointmentsQuery,
};
use crate::services::validation::validate_booking_window;

const APPOINTMENT_COLUMNS: &str =
    "id,customer_id,provider_id,starts_at,ends_at,status,created_at";

/// Books, reads and mutates rows in the `appointments` table.
///
/// Overlap protection is not implemented here. The table carries an
/// exclusion constraint over `(provider_id, tstzrange(starts_at, ends_at))`
/// restricted to active statuses, so two racing inserts are serialized by
/// the database and exactly one of them receives a `23P01` rejection. The
/// service only has to translate that rejection; it never pre-checks.
pub struct BookingService {
    postgrest: PostgrestClient,
    availability: AvailabilityService,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            postgrest: PostgrestClient::new(config),
            availability: AvailabilityService::new(config),
        }
    }

    /// Validate and insert a new appointment in `pending` state.
    pub async fn book_appointment(
        &self,
        request: &BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        validate_booking_window(request.starts_at, request.ends_at, Utc::now())?;

        let exists = self
            .availability
            .provider_exists(request.provider_id, auth_token)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;
        if !exists {
            return Err(AppointmentError::InvalidProvider);
        }

        debug!(
            "Booking appointment for customer {} with provider {} at {}",
            request.customer_id, request.provider_id, request.starts_at
        );

        let body = json!({
            "customer_id": request.customer_id,
            "provider_id": request.provider_id,
            "starts_at": request.starts_at,
            "ends_at": request.ends_at,
            "status": AppointmentStatus::Pending,
        });

        let rows: Vec<Appointment> = self
            .postgrest
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(auth_token),
                Some(body),
                Some(Self::return_representation()),
            )
            .await?;

        let appointment = rows
            .into_iter()
            .next()
            .ok_or_else(|| AppointmentError::DatabaseError("insert returned no row".to_string()))?;

        info!(
            "Appointment {} booked: provider {} from {} to {}",
            appointment.id, appointment.provider_id, appointment.starts_at, appointment.ends_at
        );
        Ok(appointment)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&select={}",
            appointment_id, APPOINTMENT_COLUMNS
        );
        let rows: Vec<Appointment> = self
            .postgrest
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        rows.into_iter().next().ok_or(AppointmentError::NotFound)
    }

    /// List appointments in chronological order, optionally filtered.
    pub async fn list_appointments(
        &self,
        query: &ListAppointmentsQuery,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut path = format!(
            "/rest/v1/appointments?select={}&order=starts_at.asc",
            APPOINTMENT_COLUMNS
        );
        if let Some(provider_id) = query.provider_id {
            path.push_str(&format!("&provider_id=eq.{}", provider_id));
        }
        if let Some(customer_id) = query.customer_id {
            path.push_str(&format!("&customer_id=eq.{}", customer_id));
        }
        if let Some(status) = query.status {
            path.push_str(&format!("&status=eq.{}", status));
        }

        let rows: Vec<Appointment> = self
            .postgrest
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;
        Ok(rows)
    }

    /// Move an appointment to a new status. Authorization must already have
    /// been established against the stored row.
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&select={}",
            appointment_id, APPOINTMENT_COLUMNS
        );
        let rows: Vec<Appointment> = self
            .postgrest
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(json!({ "status": status })),
                Some(Self::return_representation()),
            )
            .await?;

        rows.into_iter().next().ok_or(AppointmentError::NotFound)
    }

    /// Permanently remove an appointment row.
    pub async fn delete_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<(), AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        self.postgrest
            .execute(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        info!("Appointment {} deleted", appointment_id);
        Ok(())
    }

    fn return_representation() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        headers
    }
}
