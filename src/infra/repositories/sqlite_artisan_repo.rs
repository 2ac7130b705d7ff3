use crate::domain::{models::artisan::Artisan, ports::ArtisanRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{SqlitePool, Row};

pub struct SqliteArtisanRepo {
    pool: SqlitePool,
}

impl SqliteArtisanRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArtisanRepository for SqliteArtisanRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Artisan>, AppError> {
        sqlx::query_as::<_, Artisan>(
            "SELECT id, display_name, email, subscription_plan, created_at FROM artisans WHERE id = ?",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_service_rate(&self, artisan_id: &str, service_id: &str) -> Result<Option<i64>, AppError> {
        let row = sqlx::query("SELECT price_cents FROM artisan_services WHERE artisan_id = ? AND service_id = ?")
            .bind(artisan_id)
            .bind(service_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.map(|r| r.get::<i64, _>("price_cents")))
    }
}
