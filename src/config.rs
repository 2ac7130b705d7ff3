use chrono_tz::Tz;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub notification_service_url: String,
    pub notification_service_token: String,
    /// Timezone in which slot dates/times and "today" are interpreted.
    pub timezone: Tz,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            notification_service_url: env::var("NOTIFICATION_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            notification_service_token: env::var("NOTIFICATION_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            timezone: env::var("PLATFORM_TIMEZONE")
                .unwrap_or_else(|_| "Europe/Paris".to_string())
                .parse()
                .expect("PLATFORM_TIMEZONE must be a valid IANA timezone"),
        }
    }
}
