mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
use repos::Repos;
pub use repos::{IDeviceRepo, IReminderRepo};
pub use services::{
    DeliveryError, LocalNotification, LocalNotifier, NotificationActionButton, NotificationData,
    NotificationService, PushPayload, ReminderNotification,
};
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

/// Explicitly constructed application context: store handles, channel
/// handles, config and the clock all travel together instead of living in
/// ambient globals.
#[derive(Clone)]
pub struct RemediContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: NotificationService,
}

struct ContextParams {
    pub database_url: String,
}

impl RemediContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_sqlite(&params.database_url)
            .await
            .expect("Database url must point to a usable sqlite database");
        let config = Config::new();
        let notifier = NotificationService::new(&config);
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            notifier,
        }
    }

    pub fn create_inmemory() -> Self {
        let config = Config::new();
        let notifier = NotificationService::new(&config);
        Self {
            repos: Repos::create_inmemory(),
            config,
            sys: Arc::new(RealSys {}),
            notifier,
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> RemediContext {
    RemediContext::create(ContextParams {
        database_url: get_database_url(),
    })
    .await
}

fn get_database_url() -> String {
    const DATABASE_URL: &str = "DATABASE_URL";
    const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

    std::env::var(DATABASE_URL).unwrap_or_else(|_| DEFAULT_DATABASE_URL.into())
}
