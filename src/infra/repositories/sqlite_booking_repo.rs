use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::{AppError, is_unique_violation};
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn claim_slot(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let claimed = sqlx::query("UPDATE availability_slots SET is_available = 0 WHERE id = ? AND artisan_id = ? AND is_available = 1")
            .bind(&booking.slot_id).bind(&booking.artisan_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if claimed.rows_affected() == 0 {
            return Err(AppError::Conflict("Slot is no longer available".into()));
        }

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, artisan_id, slot_id, client_name, client_email, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.artisan_id).bind(&booking.slot_id)
            .bind(&booking.client_name).bind(&booking.client_email).bind(&booking.status).bind(booking.created_at)
            .fetch_one(&mut *tx).await
            .map_err(|e| if is_unique_violation(&e) {
                AppError::Conflict("Slot is already booked".into())
            } else {
                AppError::Database(e)
            })?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, artisan_id: &str, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE artisan_id = ? AND id = ?")
            .bind(artisan_id).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn cancel(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let cancelled = sqlx::query_as::<_, Booking>("UPDATE bookings SET status = 'cancelled' WHERE id = ? AND status <> 'cancelled' RETURNING *")
            .bind(&booking.id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Booking is already cancelled".into()))?;
        sqlx::query("UPDATE availability_slots SET is_available = 1 WHERE id = ?")
            .bind(&booking.slot_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(cancelled)
    }
}
