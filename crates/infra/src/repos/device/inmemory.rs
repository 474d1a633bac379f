use super::IDeviceRepo;
use remedi_domain::DeviceRegistration;
use std::sync::Mutex;

pub struct InMemoryDeviceRepo {
    device: Mutex<Option<DeviceRegistration>>,
}

impl InMemoryDeviceRepo {
    pub fn new() -> Self {
        Self {
            device: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl IDeviceRepo for InMemoryDeviceRepo {
    async fn set(&self, device: &DeviceRegistration) -> anyhow::Result<()> {
        *self.device.lock().unwrap() = Some(device.clone());
        Ok(())
    }

    async fn get(&self) -> anyhow::Result<Option<DeviceRegistration>> {
        Ok(self.device.lock().unwrap().clone())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        *self.device.lock().unwrap() = None;
        Ok(())
    }
}
