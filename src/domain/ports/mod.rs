use crate::domain::models::{
    artisan::Artisan, availability::AvailabilityPolicy, booking::Booking, slot::Slot,
    waitlist::WaitlistEntry, pricing::PricingSettings,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Source of "now". Everything time-dependent reads it through here.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[async_trait]
pub trait ArtisanRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Artisan>, AppError>;
    /// Contracted price for a service, in cents.
    async fn find_service_rate(&self, artisan_id: &str, service_id: &str) -> Result<Option<i64>, AppError>;
}

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn find(&self, artisan_id: &str) -> Result<Option<AvailabilityPolicy>, AppError>;
    async fn upsert(&self, policy: &AvailabilityPolicy) -> Result<AvailabilityPolicy, AppError>;
}

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Deletes every slot of the day and inserts `slots` in one transaction.
    /// Fails with `Conflict` and changes nothing if a booking references a slot of that day.
    async fn replace_day(&self, artisan_id: &str, date: NaiveDate, slots: &[Slot]) -> Result<Vec<Slot>, AppError>;
    async fn list_available(&self, artisan_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Slot>, AppError>;
    async fn find_by_id(&self, artisan_id: &str, id: &str) -> Result<Option<Slot>, AppError>;
    /// `NotFound` if absent, `Conflict` if any booking references it.
    async fn delete_unreferenced(&self, artisan_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Marks the slot unavailable and inserts the booking atomically.
    /// `Conflict` when the slot was claimed concurrently.
    async fn claim_slot(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, artisan_id: &str, id: &str) -> Result<Option<Booking>, AppError>;
    /// Cancels the booking and re-opens its slot atomically.
    async fn cancel(&self, booking: &Booking) -> Result<Booking, AppError>;
}

#[async_trait]
pub trait WaitlistRepository: Send + Sync {
    /// `Conflict` when a waiting entry already exists for (artisan, email, date).
    async fn create(&self, entry: &WaitlistEntry) -> Result<WaitlistEntry, AppError>;
    async fn find_by_id(&self, artisan_id: &str, id: &str) -> Result<Option<WaitlistEntry>, AppError>;
    async fn list_waiting_from(&self, artisan_id: &str, from: NaiveDate) -> Result<Vec<WaitlistEntry>, AppError>;
    /// Conditional `waiting -> status` transition. `None` if the entry was no longer waiting.
    async fn transition_from_waiting(&self, id: &str, status: &str, notified_at: Option<DateTime<Utc>>) -> Result<Option<WaitlistEntry>, AppError>;
}

#[async_trait]
pub trait PricingSettingsRepository: Send + Sync {
    async fn find(&self, artisan_id: &str) -> Result<Option<PricingSettings>, AppError>;
    async fn upsert(&self, settings: &PricingSettings) -> Result<PricingSettings, AppError>;
}

/// A rendered message for a client, handed to the delivery transport.
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: String,
    pub recipient_email: String,
    pub recipient_phone: Option<String>,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), AppError>;
}
