// libs/provider-cell/src/models.rs
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use shared_database::DbError;

// ==============================================================================
// WEEKDAY AND AVAILABILITY MODELS
// ==============================================================================

/// Day of week as stored and exposed by the availability API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    pub fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Weekday::Sun,
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
        }
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Sat | Weekday::Sun)
    }

    /// Column names of the per-day time pair on the `staff` row.
    pub fn start_column(self) -> &'static str {
        match self {
            Weekday::Sun => "sun_start",
            Weekday::Mon => "mon_start",
            Weekday::Tue => "tue_start",
            Weekday::Wed => "wed_start",
            Weekday::Thu => "thu_start",
            Weekday::Fri => "fri_start",
            Weekday::Sat => "sat_start",
        }
    }

    pub fn end_column(self) -> &'static str {
        match self {
            Weekday::Sun => "sun_end",
            Weekday::Mon => "mon_end",
            Weekday::Tue => "tue_end",
            Weekday::Wed => "wed_end",
            Weekday::Thu => "thu_end",
            Weekday::Fri => "fri_end",
            Weekday::Sat => "sat_end",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Sun => "sun",
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
        };
        write!(f, "{}", name)
    }
}

/// One open/close pair for a weekday. Invariant at write time: start < end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl AvailabilityWindow {
    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }
}

/// Keyed weekday -> window container. Consumers look windows up by weekday
/// instead of reaching into the per-day columns of the storage row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub days: BTreeMap<Weekday, AvailabilityWindow>,
}

impl WeeklySchedule {
    pub fn window_for(&self, day: Weekday) -> Option<&AvailabilityWindow> {
        self.days.get(&day)
    }

    pub fn with_window(mut self, day: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
        self.days.insert(day, AvailabilityWindow { start, end });
        self
    }
}

/// Raw `staff` row as PostgREST returns it: one optional time pair per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffAvailabilityRow {
    pub user_id: Uuid,
    pub sun_start: Option<NaiveTime>,
    pub sun_end: Option<NaiveTime>,
    pub mon_start: Option<NaiveTime>,
    pub mon_end: Option<NaiveTime>,
    pub tue_start: Option<NaiveTime>,
    pub tue_end: Option<NaiveTime>,
    pub wed_start: Option<NaiveTime>,
    pub wed_end: Option<NaiveTime>,
    pub thu_start: Option<NaiveTime>,
    pub thu_end: Option<NaiveTime>,
    pub fri_start: Option<NaiveTime>,
    pub fri_end: Option<NaiveTime>,
    pub sat_start: Option<NaiveTime>,
    pub sat_end: Option<NaiveTime>,
}

impl StaffAvailabilityRow {
    fn pair(&self, day: Weekday) -> (Option<NaiveTime>, Option<NaiveTime>) {
        match day {
            Weekday::Sun => (self.sun_start, self.sun_end),
            Weekday::Mon => (self.mon_start, self.mon_end),
            Weekday::Tue => (self.tue_start, self.tue_end),
            Weekday::Wed => (self.wed_start, self.wed_end),
            Weekday::Thu => (self.thu_start, self.thu_end),
            Weekday::Fri => (self.fri_start, self.fri_end),
            Weekday::Sat => (self.sat_start, self.sat_end),
        }
    }

    /// Collapse the column pairs into the keyed container. Days with a
    /// half-set pair are treated as unconfigured.
    pub fn into_schedule(self) -> WeeklySchedule {
        let mut schedule = WeeklySchedule::default();
        for day in Weekday::ALL {
            if let (Some(start), Some(end)) = self.pair(day) {
                schedule.days.insert(day, AvailabilityWindow { start, end });
            }
        }
        schedule
    }
}

// ==============================================================================
// SLOT MODELS
// ==============================================================================

/// Derived, never-persisted candidate booking interval of fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAvailabilityRequest {
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Wire shape for `GET /{provider_id}/availability`: every weekday is present,
/// unconfigured days carry nulls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayWindowBody {
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub days: BTreeMap<Weekday, DayWindowBody>,
}

impl AvailabilityResponse {
    pub fn from_schedule(schedule: &WeeklySchedule) -> Self {
        let mut days = BTreeMap::new();
        for day in Weekday::ALL {
            let window = schedule.window_for(day);
            days.insert(
                day,
                DayWindowBody {
                    start: window.map(|w| w.start),
                    end: window.map(|w| w.end),
                },
            );
        }
        Self { days }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider not found")]
    NotFound,

    #[error("Invalid availability window: {0}")]
    InvalidWindow(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DbError> for ProviderError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(_) => ProviderError::NotFound,
            other => ProviderError::DatabaseError(other.to_string()),
        }
    }
}
