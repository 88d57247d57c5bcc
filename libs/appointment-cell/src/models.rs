use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_database::DbError;
use uuid::Uuid;

/// Lifecycle states an appointment can be in.
///
/// Transitions are deliberately unrestricted: the assigned provider or an
/// admin may move an appointment between any pair of states, including
/// reviving a cancelled one. Serialized in snake_case to match the
/// `appointment_status` enum in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Approved => "approved",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }

    /// Active appointments occupy the provider's calendar.
    pub fn is_active(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Approved)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A booked appointment as stored in the `appointments` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

/// Optional filters for listing appointments. Role scoping is applied on
/// top of these by the service layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAppointmentsQuery {
    pub provider_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("appointment must end after it starts")]
    InvalidRange,

    #[error("appointment start is in the past")]
    PastBooking,

    #[error("appointment start is more than six months ahead")]
    TooFarInFuture,

    #[error("provider does not exist or cannot take appointments")]
    InvalidProvider,

    #[error("requested time overlaps an existing appointment for this provider")]
    OverlapConflict,

    #[error("appointment not found")]
    NotFound,

    #[error("not allowed to modify this appointment")]
    Forbidden,

    #[error("database error: {0}")]
    DatabaseError(String),
}

impl From<DbError> for AppointmentError {
    fn from(err: DbError) -> Self {
        if err.is_exclusion_violation() {
            return AppointmentError::OverlapConflict;
        }
        match err {
            DbError::NotFound(_) => AppointmentError::NotFound,
            other => AppointmentError::DatabaseError(other.to_string()),
        }
    }
}
