use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{Clock, NotificationService};
use crate::domain::services::waitlist_service::{WAITLIST_SUBJECT_TEMPLATE, WAITLIST_TEMPLATE};
use crate::infra::clock::SystemClock;
use crate::infra::notifications::http_notification_service::HttpNotificationService;
use crate::infra::repositories::{
    postgres_artisan_repo::PostgresArtisanRepo, postgres_availability_repo::PostgresAvailabilityRepo,
    postgres_slot_repo::PostgresSlotRepo, postgres_booking_repo::PostgresBookingRepo,
    postgres_waitlist_repo::PostgresWaitlistRepo, postgres_pricing_repo::PostgresPricingRepo,
    sqlite_artisan_repo::SqliteArtisanRepo, sqlite_availability_repo::SqliteAvailabilityRepo,
    sqlite_slot_repo::SqliteSlotRepo, sqlite_booking_repo::SqliteBookingRepo,
    sqlite_waitlist_repo::SqliteWaitlistRepo, sqlite_pricing_repo::SqlitePricingRepo,
};

pub fn load_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template(WAITLIST_TEMPLATE, include_str!("../templates/waitlist_available.html"))
        .expect("Failed to load waitlist template");
    tera.add_raw_template(WAITLIST_SUBJECT_TEMPLATE, "A slot opened up with {{ artisan_name }}")
        .expect("Failed to load waitlist subject template");
    tera
}

/// Wires the SQLite adapters around an existing pool.
pub fn sqlite_state(
    config: &Config,
    pool: SqlitePool,
    notification_service: Arc<dyn NotificationService>,
    clock: Arc<dyn Clock>,
) -> AppState {
    AppState {
        config: config.clone(),
        artisan_repo: Arc::new(SqliteArtisanRepo::new(pool.clone())),
        availability_repo: Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
        slot_repo: Arc::new(SqliteSlotRepo::new(pool.clone())),
        booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
        waitlist_repo: Arc::new(SqliteWaitlistRepo::new(pool.clone())),
        pricing_repo: Arc::new(SqlitePricingRepo::new(pool)),
        notification_service,
        clock,
        templates: Arc::new(load_templates()),
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let notification_service = Arc::new(HttpNotificationService::new(
        config.notification_service_url.clone(),
        config.notification_service_token.clone(),
    ));
    let clock = Arc::new(SystemClock);

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            artisan_repo: Arc::new(PostgresArtisanRepo::new(pool.clone())),
            availability_repo: Arc::new(PostgresAvailabilityRepo::new(pool.clone())),
            slot_repo: Arc::new(PostgresSlotRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            waitlist_repo: Arc::new(PostgresWaitlistRepo::new(pool.clone())),
            pricing_repo: Arc::new(PostgresPricingRepo::new(pool)),
            notification_service,
            clock,
            templates: Arc::new(load_templates()),
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        sqlite_state(config, pool, notification_service, clock)
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
