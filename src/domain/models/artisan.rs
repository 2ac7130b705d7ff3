use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const PLAN_FREE: &str = "free";
pub const PLAN_PRO: &str = "pro";
pub const PLAN_PREMIUM: &str = "premium";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Artisan {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub subscription_plan: String,
    pub created_at: DateTime<Utc>,
}

impl Artisan {
    /// Anything but the free plan counts as paid, including plans added later.
    pub fn is_paid_tier(&self) -> bool {
        !self.subscription_plan.eq_ignore_ascii_case(PLAN_FREE)
    }
}
