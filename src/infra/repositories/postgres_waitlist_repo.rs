use crate::domain::{models::waitlist::WaitlistEntry, ports::WaitlistRepository};
use crate::error::{AppError, is_unique_violation};
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::{DateTime, NaiveDate, Utc};

pub struct PostgresWaitlistRepo {
    pool: PgPool,
}

impl PostgresWaitlistRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl WaitlistRepository for PostgresWaitlistRepo {
    async fn create(&self, entry: &WaitlistEntry) -> Result<WaitlistEntry, AppError> {
        sqlx::query_as::<_, WaitlistEntry>(
            r#"INSERT INTO waitlist_entries (id, artisan_id, client_name, client_email, client_phone, preferred_date, preferred_time_slot, service_name, status, notified_at, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING *"#
        )
            .bind(&entry.id)
            .bind(&entry.artisan_id)
            .bind(&entry.client_name)
            .bind(&entry.client_email)
            .bind(&entry.client_phone)
            .bind(entry.preferred_date)
            .bind(&entry.preferred_time_slot)
            .bind(&entry.service_name)
            .bind(&entry.status)
            .bind(entry.notified_at)
            .bind(entry.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| if is_unique_violation(&e) {
                AppError::Conflict("Already on the waitlist for this date".into())
            } else {
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, artisan_id: &str, id: &str) -> Result<Option<WaitlistEntry>, AppError> {
        sqlx::query_as::<_, WaitlistEntry>("SELECT * FROM waitlist_entries WHERE artisan_id = $1 AND id = $2")
            .bind(artisan_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_waiting_from(&self, artisan_id: &str, from: NaiveDate) -> Result<Vec<WaitlistEntry>, AppError> {
        sqlx::query_as::<_, WaitlistEntry>(
            "SELECT * FROM waitlist_entries WHERE artisan_id = $1 AND status = 'waiting' AND preferred_date >= $2 ORDER BY preferred_date ASC, created_at ASC"
        )
            .bind(artisan_id)
            .bind(from)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn transition_from_waiting(&self, id: &str, status: &str, notified_at: Option<DateTime<Utc>>) -> Result<Option<WaitlistEntry>, AppError> {
        sqlx::query_as::<_, WaitlistEntry>(
            "UPDATE waitlist_entries SET status = $1, notified_at = COALESCE($2, notified_at) WHERE id = $3 AND status = 'waiting' RETURNING *"
        )
            .bind(status)
            .bind(notified_at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
