use crate::domain::{models::availability::AvailabilityPolicy, ports::AvailabilityRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresAvailabilityRepo {
    pool: PgPool,
}

impl PostgresAvailabilityRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl AvailabilityRepository for PostgresAvailabilityRepo {
    async fn find(&self, artisan_id: &str) -> Result<Option<AvailabilityPolicy>, AppError> {
        sqlx::query_as::<_, AvailabilityPolicy>(
            "SELECT * FROM availability_settings WHERE artisan_id = $1"
        )
            .bind(artisan_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upsert(&self, policy: &AvailabilityPolicy) -> Result<AvailabilityPolicy, AppError> {
        sqlx::query_as::<_, AvailabilityPolicy>(
            r#"INSERT INTO availability_settings (artisan_id, default_slots, working_days, booking_enabled, advance_booking_days, min_notice_hours, intervention_radius_km)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               ON CONFLICT(artisan_id) DO UPDATE SET
               default_slots=excluded.default_slots,
               working_days=excluded.working_days,
               booking_enabled=excluded.booking_enabled,
               advance_booking_days=excluded.advance_booking_days,
               min_notice_hours=excluded.min_notice_hours,
               intervention_radius_km=excluded.intervention_radius_km
               RETURNING *"#
        )
            .bind(&policy.artisan_id)
            .bind(&policy.default_slots)
            .bind(&policy.working_days)
            .bind(policy.booking_enabled)
            .bind(policy.advance_booking_days)
            .bind(policy.min_notice_hours)
            .bind(policy.intervention_radius_km)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
