use std::sync::Arc;
use crate::domain::ports::{
    ArtisanRepository, AvailabilityRepository, SlotRepository, BookingRepository,
    WaitlistRepository, PricingSettingsRepository, NotificationService, Clock,
};
use crate::domain::services::waitlist_service::WaitlistService;
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub artisan_repo: Arc<dyn ArtisanRepository>,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub slot_repo: Arc<dyn SlotRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub waitlist_repo: Arc<dyn WaitlistRepository>,
    pub pricing_repo: Arc<dyn PricingSettingsRepository>,
    pub notification_service: Arc<dyn NotificationService>,
    pub clock: Arc<dyn Clock>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn waitlist_service(&self) -> WaitlistService {
        WaitlistService::new(
            self.waitlist_repo.clone(),
            self.artisan_repo.clone(),
            self.notification_service.clone(),
            self.templates.clone(),
        )
    }
}
