use crate::domain::{models::slot::{Slot, SlotUsage}, ports::SlotRepository};
use crate::error::{AppError, booked_slot_conflict};
use async_trait::async_trait;
use sqlx::{SqlitePool, Row};
use chrono::NaiveDate;
use tracing::debug;

pub struct SqliteSlotRepo {
    pool: SqlitePool,
}

impl SqliteSlotRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl SlotRepository for SqliteSlotRepo {
    async fn replace_day(&self, artisan_id: &str, date: NaiveDate, slots: &[Slot]) -> Result<Vec<Slot>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let booked = sqlx::query(
            "SELECT COUNT(*) as count FROM bookings b JOIN availability_slots s ON s.id = b.slot_id WHERE s.artisan_id = ? AND s.date = ?"
        )
            .bind(artisan_id).bind(date)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?
            .get::<i64, _>("count");
        if booked > 0 {
            return Err(AppError::Conflict("Day has booked slots and cannot be replaced".into()));
        }

        let removed = sqlx::query("DELETE FROM availability_slots WHERE artisan_id = ? AND date = ?")
            .bind(artisan_id).bind(date)
            .execute(&mut *tx).await
            .map_err(booked_slot_conflict)?;
        debug!("replace_day removed {} slots", removed.rows_affected());

        let mut created = Vec::with_capacity(slots.len());
        for slot in slots {
            let row = sqlx::query_as::<_, Slot>(
                "INSERT INTO availability_slots (id, artisan_id, date, start_time, end_time, is_available, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)
                 RETURNING *"
            )
                .bind(&slot.id).bind(&slot.artisan_id).bind(slot.date)
                .bind(slot.start_time).bind(slot.end_time).bind(slot.is_available).bind(slot.created_at)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
            created.push(row);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn list_available(&self, artisan_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Slot>, AppError> {
        sqlx::query_as::<_, Slot>(
            "SELECT * FROM availability_slots WHERE artisan_id = ? AND is_available = 1 AND date >= ? AND date <= ? ORDER BY date, start_time"
        )
            .bind(artisan_id).bind(start).bind(end)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, artisan_id: &str, id: &str) -> Result<Option<Slot>, AppError> {
        sqlx::query_as::<_, Slot>("SELECT * FROM availability_slots WHERE artisan_id = ? AND id = ?")
            .bind(artisan_id).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete_unreferenced(&self, artisan_id: &str, id: &str) -> Result<(), AppError> {
        let usage = sqlx::query_as::<_, SlotUsage>(
            "SELECT s.id, (SELECT COUNT(*) FROM bookings b WHERE b.slot_id = s.id) AS booking_count
             FROM availability_slots s WHERE s.artisan_id = ? AND s.id = ?"
        )
            .bind(artisan_id).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Slot not found".into()))?;

        if usage.booking_count > 0 {
            return Err(AppError::Conflict("Slot is referenced by a booking".into()));
        }

        let result = sqlx::query(
            "DELETE FROM availability_slots WHERE artisan_id = ? AND id = ? AND NOT EXISTS (SELECT 1 FROM bookings b WHERE b.slot_id = availability_slots.id)"
        )
            .bind(artisan_id).bind(&usage.id)
            .execute(&self.pool).await
            .map_err(booked_slot_conflict)?;

        if result.rows_affected() == 0 {
            // Lost a race: either booked or deleted since the read.
            return match self.find_by_id(artisan_id, &usage.id).await? {
                Some(_) => Err(AppError::Conflict("Slot is referenced by a booking".into())),
                None => Err(AppError::NotFound("Slot not found".into())),
            };
        }
        Ok(())
    }
}
