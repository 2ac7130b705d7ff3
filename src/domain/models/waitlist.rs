use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

pub const WAITLIST_WAITING: &str = "waiting";
pub const WAITLIST_NOTIFIED: &str = "notified";
pub const WAITLIST_REMOVED: &str = "removed";

pub const TIME_SLOTS: [&str; 3] = ["morning", "afternoon", "any"];

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct WaitlistEntry {
    pub id: String,
    pub artisan_id: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub preferred_date: NaiveDate,
    pub preferred_time_slot: String,
    pub service_name: Option<String>,
    pub status: String,
    pub notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

pub struct NewWaitlistParams {
    pub artisan_id: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub preferred_date: NaiveDate,
    pub preferred_time_slot: Option<String>,
    pub service_name: Option<String>,
}

impl WaitlistEntry {
    pub fn new(params: NewWaitlistParams, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            artisan_id: params.artisan_id,
            client_name: params.client_name.trim().to_string(),
            client_email: params.client_email.trim().to_lowercase(),
            client_phone: params.client_phone,
            preferred_date: params.preferred_date,
            preferred_time_slot: params.preferred_time_slot.unwrap_or_else(|| "any".to_string()),
            service_name: params.service_name,
            status: WAITLIST_WAITING.to_string(),
            notified_at: None,
            created_at,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.status == WAITLIST_WAITING
    }
}
