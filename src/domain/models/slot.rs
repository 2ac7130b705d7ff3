use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Slot {
    pub id: String,
    pub artisan_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl Slot {
    pub fn new(artisan_id: String, date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            artisan_id,
            date,
            start_time,
            end_time,
            is_available: true,
            created_at,
        }
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }
}

/// Result of the single existence-and-reference read done before deleting a slot.
#[derive(Debug, FromRow)]
pub struct SlotUsage {
    pub id: String,
    pub booking_count: i64,
}
