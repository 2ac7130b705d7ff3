use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    OffPeak,
    LastMinute,
    /// Weekend rule; reported under this name to clients.
    HighDemand,
    Holiday,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppliedRule {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    /// Signed percentage points.
    pub discount: i32,
    pub description: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PriceQuote {
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_price: Decimal,
    pub applied_rules: Vec<AppliedRule>,
    #[serde(with = "rust_decimal::serde::float")]
    pub savings: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub surcharge: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CustomRule {
    #[serde(rename = "type")]
    pub rule_type: String,
    pub discount: i32,
    pub description: String,
}

/// Per-artisan override configuration. Stored only; quotes always use the fixed catalog.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PricingSettings {
    pub artisan_id: String,
    pub enable_dynamic_pricing: bool,
    pub off_peak_discount: i32,
    pub weekend_surcharge: i32,
    pub last_minute_surcharge: i32,
    pub holiday_surcharge: i32,
    pub custom_rules: Json<Vec<CustomRule>>,
    pub updated_at: DateTime<Utc>,
}

impl PricingSettings {
    pub fn default_for(artisan_id: &str, updated_at: DateTime<Utc>) -> Self {
        Self {
            artisan_id: artisan_id.to_string(),
            enable_dynamic_pricing: true,
            off_peak_discount: -15,
            weekend_surcharge: 5,
            last_minute_surcharge: 10,
            holiday_surcharge: 20,
            custom_rules: Json(Vec::new()),
            updated_at,
        }
    }
}
