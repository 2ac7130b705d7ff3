use crate::domain::models::{availability::TimeRange, pricing::CustomRule};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SlotRangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Deserialize)]
pub struct ReplaceDayRequest {
    pub date: NaiveDate,
    pub slots: Vec<TimeRange>,
}

#[derive(Deserialize)]
pub struct PriceQuery {
    pub artisan_id: Option<String>,
    pub service_id: Option<String>,
    pub date: NaiveDate,
    /// `HH:MM`
    pub time: String,
    pub base_price: Option<String>,
}

#[derive(Deserialize)]
pub struct SavePricingSettingsRequest {
    pub enable_dynamic_pricing: Option<bool>,
    pub off_peak_discount: Option<i32>,
    pub weekend_surcharge: Option<i32>,
    pub last_minute_surcharge: Option<i32>,
    pub holiday_surcharge: Option<i32>,
    pub custom_rules: Option<Vec<CustomRule>>,
}

#[derive(Deserialize)]
pub struct JoinWaitlistRequest {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub preferred_date: NaiveDate,
    pub preferred_time_slot: Option<String>,
    pub service_name: Option<String>,
}

#[derive(Deserialize)]
pub struct WaitlistActionQuery {
    pub action: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub slot_id: String,
    pub client_name: String,
    pub client_email: String,
}
