use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const BOOKING_CONFIRMED: &str = "confirmed";
pub const BOOKING_CANCELLED: &str = "cancelled";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub artisan_id: String,
    pub slot_id: String,
    pub client_name: String,
    pub client_email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(artisan_id: String, slot_id: String, client_name: String, client_email: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            artisan_id,
            slot_id,
            client_name,
            client_email,
            status: BOOKING_CONFIRMED.to_string(),
            created_at,
        }
    }
}
