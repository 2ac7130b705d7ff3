use crate::domain::ports::{Notification, NotificationService};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

pub struct HttpNotificationService {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpNotificationService {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct NotificationPayload<'a> {
    notification_type: &'a str,
    to_addr: &'a str,
    to_phone: Option<&'a str>,
    subject: &'a str,
    html_body: &'a str,
}

#[async_trait]
impl NotificationService for HttpNotificationService {
    async fn send(&self, notification: &Notification) -> Result<(), AppError> {
        let payload = NotificationPayload {
            notification_type: &notification.kind,
            to_addr: &notification.recipient_email,
            to_phone: notification.recipient_phone.as_deref(),
            subject: &notification.subject,
            html_body: &notification.html_body,
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Notification service connection error: {}", e);
                error!("{}", msg);
                AppError::Upstream(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Notification service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::Upstream(msg));
        }

        Ok(())
    }
}
