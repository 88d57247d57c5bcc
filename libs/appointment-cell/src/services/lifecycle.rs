use shared_models::auth::User;

use crate::models::{Appointment, AppointmentError};

/// Pure authorization rules for mutating a stored appointment.
///
/// The status model is permissive: any state can move to any other state,
/// including cancelled back to pending, as long as the caller holds the
/// right role. The rules here only decide WHO may act, never which
/// transition is legal.
pub struct LifecycleRules;

impl LifecycleRules {
    /// Status changes are reserved for the assigned provider and admins.
    /// Customers cannot approve or complete their own bookings.
    pub fn authorize_status_change(
        user: &User,
        appointment: &Appointment,
    ) -> Result<(), AppointmentError> {
        if user.is_admin() {
            return Ok(());
        }
        if user.is_staff() && user.id == appointment.provider_id.to_string() {
            return Ok(());
        }
        Err(AppointmentError::Forbidden)
    }

    /// Deletion is open to admins, the assigned provider, and the customer
    /// who owns the booking. Customer deletion is a hard delete, not a
    /// cancellation.
    pub fn authorize_delete(
        user: &User,
        appointment: &Appointment,
    ) -> Result<(), AppointmentError> {
        if user.is_admin() {
            return Ok(());
        }
        if user.is_staff() && user.id == appointment.provider_id.to_string() {
            return Ok(());
        }
        if user.is_customer() && user.id == appointment.customer_id.to_string() {
            return Ok(());
        }
        Err(AppointmentError::Forbidden)
    }

    /// Booking on behalf of another customer is an admin-only operation.
    pub fn authorize_booking(
        user: &User,
        customer_id: &uuid::Uuid,
    ) -> Result<(), AppointmentError> {
        if user.is_admin() || user.id == customer_id.to_string() {
            return Ok(());
        }
        Err(AppointmentError::Forbidden)
    }
}
