use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{AvailabilityWindow, Slot, Weekday, WeeklySchedule};

/// Fixed bookable slot length. Slots are grid-aligned multiples of this from
/// the window start, which is also what makes the overlap exclusion
/// constraint's range semantics line up with the advertised slots.
pub const SLOT_MINUTES: i64 = 60;

/// Candidate slots for one provider and calendar date.
///
/// Pure function of the weekly schedule: it answers "what does the provider's
/// availability allow" and deliberately never consults existing appointments.
/// Whether a slot is still free is decided by the writer at commit time.
pub fn slots_for_date(schedule: &WeeklySchedule, date: NaiveDate) -> Vec<Slot> {
    let day = Weekday::from_chrono(date.weekday());

    // Weekends are closed for booking even when a sat/sun window is stored.
    if day.is_weekend() {
        return Vec::new();
    }

    match schedule.window_for(day) {
        Some(window) => slots_in_window(date, window),
        None => Vec::new(),
    }
}

fn slots_in_window(date: NaiveDate, window: &AvailabilityWindow) -> Vec<Slot> {
    // Malformed row (start >= end): empty sequence, never an error.
    if !window.is_well_formed() {
        return Vec::new();
    }

    let step = Duration::minutes(SLOT_MINUTES);
    let window_end = date.and_time(window.end).and_utc();

    let mut slots = Vec::new();
    let mut current = date.and_time(window.start).and_utc();

    // Discard a trailing partial step shorter than the slot duration.
    while current + step <= window_end {
        slots.push(Slot {
            starts_at: current,
            ends_at: current + step,
        });
        current += step;
    }

    slots
}
