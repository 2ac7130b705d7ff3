use crate::domain::{models::waitlist::WaitlistEntry, ports::WaitlistRepository};
use crate::error::{AppError, is_unique_violation};
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::{DateTime, NaiveDate, Utc};

pub struct SqliteWaitlistRepo {
    pool: SqlitePool,
}

impl SqliteWaitlistRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl WaitlistRepository for SqliteWaitlistRepo {
    async fn create(&self, entry: &WaitlistEntry) -> Result<WaitlistEntry, AppError> {
        sqlx::query_as::<_, WaitlistEntry>(
            r#"INSERT INTO waitlist_entries (id, artisan_id, client_name, client_email, client_phone, preferred_date, preferred_time_slot, service_name, status, notified_at, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
        sqlx::query_as::<_, WaitlistEntry>("SELECT * FROM waitlist_entries WHERE artisan_id = ? AND id = ?")
            .bind(artisan_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_waiting_from(&self, artisan_id: &str, from: NaiveDate) -> Result<Vec<WaitlistEntry>, AppError> {
        sqlx::query_as::<_, WaitlistEntry>(
            "SELECT * FROM waitlist_entries WHERE artisan_id = ? AND status = 'waiting' AND preferred_date >= ? ORDER BY preferred_date ASC, created_at ASC"
        )
            .bind(artisan_id)
            .bind(from)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn transition_from_waiting(&self, id: &str, status: &str, notified_at: Option<DateTime<Utc>>) -> Result<Option<WaitlistEntry>, AppError> {
        sqlx::query_as::<_, WaitlistEntry>(
            "UPDATE waitlist_entries SET status = ?, notified_at = COALESCE(?, notified_at) WHERE id = ? AND status = 'waiting' RETURNING *"
        )
            .bind(status)
            .bind(notified_at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
