mod device;
mod reminder;
mod shared;

pub use device::IDeviceRepo;
use device::{InMemoryDeviceRepo, SqliteDeviceRepo};
pub use reminder::IReminderRepo;
use reminder::{InMemoryReminderRepo, SqliteReminderRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub devices: Arc<dyn IDeviceRepo>,
}

impl Repos {
    pub async fn create_sqlite(database_url: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = connect_pool(database_url).await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            reminders: Arc::new(SqliteReminderRepo::new(pool.clone())),
            devices: Arc::new(SqliteDeviceRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            devices: Arc::new(InMemoryDeviceRepo::new()),
        }
    }
}

pub(crate) async fn connect_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    // An in-memory database lives inside a single connection; giving the
    // pool more of them would hand out empty databases.
    let in_memory = database_url.contains(":memory:");
    let pool = SqlitePoolOptions::new()
        .max_connections(if in_memory { 1 } else { 4 })
        .min_connections(if in_memory { 1 } else { 0 })
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS reminders (
            reminder_uid TEXT PRIMARY KEY,
            medication_name TEXT NOT NULL,
            dosage TEXT NOT NULL,
            schedule TEXT NOT NULL,
            recurring INTEGER NOT NULL,
            next_fire_at INTEGER NOT NULL,
            delivery_state TEXT NOT NULL,
            acknowledged_action TEXT,
            created INTEGER NOT NULL,
            updated INTEGER NOT NULL
        )
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS reminders_due_idx
        ON reminders (delivery_state, next_fire_at)
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS device_registrations (
            device_uid TEXT PRIMARY KEY,
            push_token TEXT,
            updated INTEGER NOT NULL
        )
        "#,
    ];

    for statement in &statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
