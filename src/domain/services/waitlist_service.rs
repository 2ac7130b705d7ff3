use std::sync::Arc;
use chrono::{DateTime, NaiveDate, Utc};
use tera::{Context, Tera};
use tracing::{info, warn};
use crate::domain::models::waitlist::{
    NewWaitlistParams, WaitlistEntry, TIME_SLOTS, WAITLIST_NOTIFIED, WAITLIST_REMOVED,
};
use crate::domain::ports::{ArtisanRepository, Notification, NotificationService, WaitlistRepository};
use crate::error::AppError;

pub const WAITLIST_TEMPLATE: &str = "waitlist_available.html";
pub const WAITLIST_SUBJECT_TEMPLATE: &str = "waitlist_available_subject";

pub struct WaitlistService {
    repo: Arc<dyn WaitlistRepository>,
    artisans: Arc<dyn ArtisanRepository>,
    notifier: Arc<dyn NotificationService>,
    templates: Arc<Tera>,
}

fn validate_join(params: &NewWaitlistParams, today: NaiveDate) -> Result<(), AppError> {
    let name = params.client_name.trim();
    if name.is_empty() || name.len() > 200 {
        return Err(AppError::Validation("client_name is required (max 200 characters)".into()));
    }

    let email = params.client_email.trim();
    let valid_email = email.len() <= 254
        && email.split_once('@').is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'));
    if !valid_email {
        return Err(AppError::Validation("client_email is invalid".into()));
    }

    if params.client_phone.as_ref().is_some_and(|p| p.len() > 32) {
        return Err(AppError::Validation("client_phone is too long".into()));
    }
    if let Some(ref slot) = params.preferred_time_slot
        && !TIME_SLOTS.contains(&slot.as_str()) {
        return Err(AppError::Validation("preferred_time_slot must be morning, afternoon or any".into()));
    }
    if params.preferred_date < today {
        return Err(AppError::Validation("preferred_date cannot be in the past".into()));
    }
    Ok(())
}

impl WaitlistService {
    pub fn new(
        repo: Arc<dyn WaitlistRepository>,
        artisans: Arc<dyn ArtisanRepository>,
        notifier: Arc<dyn NotificationService>,
        templates: Arc<Tera>,
    ) -> Self {
        Self { repo, artisans, notifier, templates }
    }

    pub async fn join(&self, params: NewWaitlistParams, today: NaiveDate, now: DateTime<Utc>) -> Result<WaitlistEntry, AppError> {
        validate_join(&params, today)?;
        let entry = WaitlistEntry::new(params, now);
        let created = self.repo.create(&entry).await?;
        info!("Waitlist entry {} created for {}", created.id, created.preferred_date);
        Ok(created)
    }

    pub async fn list(&self, artisan_id: &str, today: NaiveDate) -> Result<Vec<WaitlistEntry>, AppError> {
        self.repo.list_waiting_from(artisan_id, today).await
    }

    /// Sends first; the entry is only marked notified once delivery succeeded.
    pub async fn notify(&self, artisan_id: &str, entry_id: &str, now: DateTime<Utc>) -> Result<WaitlistEntry, AppError> {
        let entry = self.repo.find_by_id(artisan_id, entry_id).await?
            .ok_or(AppError::NotFound("Waitlist entry not found".into()))?;

        if !entry.is_waiting() {
            return Err(AppError::Conflict(format!("Waitlist entry is already {}", entry.status)));
        }

        let artisan = self.artisans.find_by_id(artisan_id).await?
            .ok_or(AppError::NotFound("Artisan not found".into()))?;

        let notification = self.render(&entry, &artisan.display_name)?;

        if let Err(e) = self.notifier.send(&notification).await {
            warn!("Waitlist notification for entry {} failed: {}", entry.id, e);
            return Err(match e {
                AppError::Upstream(msg) => AppError::Upstream(msg),
                other => AppError::Upstream(other.to_string()),
            });
        }

        let updated = self.repo.transition_from_waiting(&entry.id, WAITLIST_NOTIFIED, Some(now)).await?
            .ok_or(AppError::Conflict("Waitlist entry changed while notifying".into()))?;
        info!("Waitlist entry {} notified", updated.id);
        Ok(updated)
    }

    pub async fn remove(&self, artisan_id: &str, entry_id: &str) -> Result<WaitlistEntry, AppError> {
        let entry = self.repo.find_by_id(artisan_id, entry_id).await?
            .ok_or(AppError::NotFound("Waitlist entry not found".into()))?;

        let updated = self.repo.transition_from_waiting(&entry.id, WAITLIST_REMOVED, None).await?
            .ok_or_else(|| AppError::Conflict(format!("Waitlist entry is already {}", entry.status)))?;
        info!("Waitlist entry {} removed", updated.id);
        Ok(updated)
    }

    fn render(&self, entry: &WaitlistEntry, artisan_name: &str) -> Result<Notification, AppError> {
        let mut context = Context::new();
        context.insert("client_name", &entry.client_name);
        context.insert("artisan_name", artisan_name);
        context.insert("preferred_date", &entry.preferred_date.format("%d/%m/%Y").to_string());
        context.insert("preferred_time_slot", &entry.preferred_time_slot);
        context.insert("service_name", &entry.service_name.clone().unwrap_or_else(|| "Service".to_string()));

        let html_body = self.templates.render(WAITLIST_TEMPLATE, &context)
            .map_err(|e| AppError::InternalWithMsg(format!("Tera render error: {:?}", e)))?;
        let subject = self.templates.render(WAITLIST_SUBJECT_TEMPLATE, &context)
            .map_err(|e| AppError::InternalWithMsg(format!("Tera subject render error: {:?}", e)))?;

        Ok(Notification {
            kind: "waitlist_available".to_string(),
            recipient_email: entry.client_email.clone(),
            recipient_phone: entry.client_phone.clone(),
            subject,
            html_body,
        })
    }
}
