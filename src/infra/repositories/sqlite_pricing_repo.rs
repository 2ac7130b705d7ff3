use crate::domain::{models::pricing::PricingSettings, ports::PricingSettingsRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePricingRepo {
    pool: SqlitePool,
}

impl SqlitePricingRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl PricingSettingsRepository for SqlitePricingRepo {
    async fn find(&self, artisan_id: &str) -> Result<Option<PricingSettings>, AppError> {
        sqlx::query_as::<_, PricingSettings>("SELECT * FROM artisan_pricing_settings WHERE artisan_id = ?")
            .bind(artisan_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upsert(&self, settings: &PricingSettings) -> Result<PricingSettings, AppError> {
        sqlx::query_as::<_, PricingSettings>(
            r#"INSERT INTO artisan_pricing_settings (artisan_id, enable_dynamic_pricing, off_peak_discount, weekend_surcharge, last_minute_surcharge, holiday_surcharge, custom_rules, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(artisan_id) DO UPDATE SET
               enable_dynamic_pricing=excluded.enable_dynamic_pricing,
               off_peak_discount=excluded.off_peak_discount,
               weekend_surcharge=excluded.weekend_surcharge,
               last_minute_surcharge=excluded.last_minute_surcharge,
               holiday_surcharge=excluded.holiday_surcharge,
               custom_rules=excluded.custom_rules,
               updated_at=excluded.updated_at
               RETURNING *"#
        )
            .bind(&settings.artisan_id)
            .bind(settings.enable_dynamic_pricing)
            .bind(settings.off_peak_discount)
            .bind(settings.weekend_surcharge)
            .bind(settings.last_minute_surcharge)
            .bind(settings.holiday_surcharge)
            .bind(&settings.custom_rules)
            .bind(settings.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
