use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

pub const DEFAULT_ADVANCE_BOOKING_DAYS: i32 = 30;
pub const DEFAULT_MIN_NOTICE_HOURS: i32 = 24;
pub const DEFAULT_INTERVENTION_RADIUS_KM: f64 = 20.0;

/// A time-of-day range, both ends formatted as `HH:MM`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn new(start: &str, end: &str) -> Self {
        Self { start: start.to_string(), end: end.to_string() }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct AvailabilityPolicy {
    pub artisan_id: String,
    pub default_slots: Json<Vec<TimeRange>>,
    /// Weekdays 0-6, 0 = Sunday.
    pub working_days: Json<Vec<u8>>,
    pub booking_enabled: bool,
    pub advance_booking_days: i32,
    pub min_notice_hours: i32,
    pub intervention_radius_km: f64,
}

impl AvailabilityPolicy {
    /// The policy every artisan has until they save their own settings.
    pub fn default_for(artisan_id: &str) -> Self {
        Self {
            artisan_id: artisan_id.to_string(),
            default_slots: Json(vec![
                TimeRange::new("08:00", "10:00"),
                TimeRange::new("10:00", "12:00"),
                TimeRange::new("14:00", "16:00"),
                TimeRange::new("16:00", "18:00"),
            ]),
            working_days: Json(vec![1, 2, 3, 4, 5]),
            booking_enabled: true,
            advance_booking_days: DEFAULT_ADVANCE_BOOKING_DAYS,
            min_notice_hours: DEFAULT_MIN_NOTICE_HOURS,
            intervention_radius_km: DEFAULT_INTERVENTION_RADIUS_KM,
        }
    }

    pub fn works_on(&self, weekday_from_sunday: u32) -> bool {
        self.working_days.iter().any(|d| u32::from(*d) == weekday_from_sunday)
    }
}

/// Partial settings; `None` keeps the stored value.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AvailabilityUpdate {
    pub default_slots: Option<Vec<TimeRange>>,
    pub working_days: Option<Vec<u8>>,
    pub booking_enabled: Option<bool>,
    pub advance_booking_days: Option<i32>,
    pub min_notice_hours: Option<i32>,
    pub intervention_radius_km: Option<f64>,
}
