use chrono::{NaiveDate, NaiveTime, Timelike};

use provider_cell::models::{Weekday, WeeklySchedule};
use provider_cell::services::slots::{slots_for_date, SLOT_MINUTES};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// 2025-03-10 is a Monday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

#[test]
fn full_day_window_yields_eight_hourly_slots() {
    let schedule = WeeklySchedule::default().with_window(Weekday::Mon, t(9, 0), t(17, 0));

    let slots = slots_for_date(&schedule, monday());

    assert_eq!(slots.len(), 8);
    assert_eq!(slots[0].starts_at.time(), t(9, 0));
    assert_eq!(slots[7].starts_at.time(), t(16, 0));
    assert_eq!(slots[7].ends_at.time(), t(17, 0));
}

#[test]
fn every_slot_sits_inside_the_window_with_fixed_length() {
    let schedule = WeeklySchedule::default().with_window(Weekday::Mon, t(8, 30), t(12, 30));

    let slots = slots_for_date(&schedule, monday());

    assert!(!slots.is_empty());
    for slot in &slots {
        assert_eq!(
            (slot.ends_at - slot.starts_at).num_minutes(),
            SLOT_MINUTES
        );
        assert!(slot.starts_at.time() >= t(8, 30));
        assert!(slot.ends_at.time() <= t(12, 30));
    }
}

#[test]
fn trailing_partial_slot_is_discarded() {
    // 90 minutes of availability holds exactly one 60-minute slot.
    let schedule = WeeklySchedule::default().with_window(Weekday::Mon, t(9, 0), t(10, 30));

    let slots = slots_for_date(&schedule, monday());

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].starts_at.time().hour(), 9);
}

#[test]
fn weekend_dates_yield_no_slots_even_with_a_stored_window() {
    let schedule = WeeklySchedule::default()
        .with_window(Weekday::Sat, t(9, 0), t(17, 0))
        .with_window(Weekday::Sun, t(9, 0), t(17, 0));

    // 2025-03-15 / 16 are Saturday and Sunday.
    let saturday = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
    let sunday = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();

    assert!(slots_for_date(&schedule, saturday).is_empty());
    assert!(slots_for_date(&schedule, sunday).is_empty());
}

#[test]
fn unconfigured_day_yields_no_slots() {
    let schedule = WeeklySchedule::default().with_window(Weekday::Tue, t(9, 0), t(17, 0));

    assert!(slots_for_date(&schedule, monday()).is_empty());
}

#[test]
fn malformed_window_yields_no_slots() {
    let inverted = WeeklySchedule::default().with_window(Weekday::Mon, t(17, 0), t(9, 0));
    let empty = WeeklySchedule::default().with_window(Weekday::Mon, t(9, 0), t(9, 0));

    assert!(slots_for_date(&inverted, monday()).is_empty());
    assert!(slots_for_date(&empty, monday()).is_empty());
}

#[test]
fn slots_are_chronological_and_gap_free() {
    let schedule = WeeklySchedule::default().with_window(Weekday::Mon, t(9, 0), t(13, 0));

    let slots = slots_for_date(&schedule, monday());

    for pair in slots.windows(2) {
        assert_eq!(pair[0].ends_at, pair[1].starts_at);
    }
}
