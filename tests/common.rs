use artisan_booking::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::ports::{Clock, Notification, NotificationService},
    infra::factory::{run_sqlite_migrations, sqlite_state},
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use std::str::FromStr;
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::Value;

/// Monday 2025-06-02, 09:00 in Europe/Paris.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 7, 0, 0).unwrap()
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Default)]
pub struct RecordingNotificationService {
    pub sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl NotificationService for RecordingNotificationService {
    async fn send(&self, notification: &Notification) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

pub struct FailingNotificationService;

#[async_trait]
impl NotificationService for FailingNotificationService {
    async fn send(&self, _notification: &Notification) -> Result<(), AppError> {
        Err(AppError::Upstream("notification service returned 503".to_string()))
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub notifications: Arc<RecordingNotificationService>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let recorder = Arc::new(RecordingNotificationService::default());
        Self::build(recorder.clone(), recorder, fixed_now()).await
    }

    pub async fn with_failing_notifier() -> Self {
        Self::build(Arc::new(FailingNotificationService), Arc::new(RecordingNotificationService::default()), fixed_now()).await
    }

    pub async fn with_clock(now: DateTime<Utc>) -> Self {
        let recorder = Arc::new(RecordingNotificationService::default());
        Self::build(recorder.clone(), recorder, now).await
    }

    async fn build(notifier: Arc<dyn NotificationService>, recorder: Arc<RecordingNotificationService>, now: DateTime<Utc>) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await;

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            notification_service_url: "http://localhost".to_string(),
            notification_service_token: "token".to_string(),
            timezone: chrono_tz::Europe::Paris,
        };

        let clock: Arc<dyn Clock> = Arc::new(FixedClock(now));
        let state = Arc::new(sqlite_state(&config, pool.clone(), notifier, clock));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            notifications: recorder,
        }
    }

    pub async fn seed_artisan(&self, display_name: &str, plan: &str) -> String {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO artisans (id, display_name, email, subscription_plan, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(display_name)
            .bind(format!("{}@artisans.test", id))
            .bind(plan)
            .bind(fixed_now())
            .execute(&self.pool).await.unwrap();
        id
    }

    pub async fn seed_service_rate(&self, artisan_id: &str, service_id: &str, price_cents: i64) {
        sqlx::query("INSERT INTO artisan_services (artisan_id, service_id, price_cents) VALUES (?, ?, ?)")
            .bind(artisan_id)
            .bind(service_id)
            .bind(price_cents)
            .execute(&self.pool).await.unwrap();
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
