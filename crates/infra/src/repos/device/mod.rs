mod inmemory;
mod sqlite;

pub use inmemory::InMemoryDeviceRepo;
use remedi_domain::DeviceRegistration;
pub use sqlite::SqliteDeviceRepo;

/// Storage for the delivery channel registration of this deployment.
/// There is at most one registered device at any time; `set` replaces any
/// previous registration.
#[async_trait::async_trait]
pub trait IDeviceRepo: Send + Sync {
    async fn set(&self, device: &DeviceRegistration) -> anyhow::Result<()>;
    async fn get(&self) -> anyhow::Result<Option<DeviceRegistration>>;
    async fn clear(&self) -> anyhow::Result<()>;
}
