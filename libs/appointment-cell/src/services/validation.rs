use chrono::{DateTime, Months, Utc};

use crate::models::AppointmentError;

/// How far ahead a booking may start, in calendar months.
pub const MAX_ADVANCE_MONTHS: u32 = 6;

/// Validates a requested booking window against the clock.
///
/// Rules run in a fixed order and the first failure wins, so a request that
/// is both inverted and in the past reports the inverted range. Provider
/// existence is checked separately by the booking service because it needs
/// the database.
pub fn validate_booking_window(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), AppointmentError> {
    if ends_at <= starts_at {
        return Err(AppointmentError::InvalidRange);
    }

    if starts_at < now {
        return Err(AppointmentError::PastBooking);
    }

    let horizon = now
        .checked_add_months(Months::new(MAX_ADVANCE_MONTHS))
        .ok_or(AppointmentError::InvalidRange)?;
    if starts_at > horizon {
        return Err(AppointmentError::TooFarInFuture);
    }

    Ok(())
}
