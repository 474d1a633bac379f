use serde::{Deserialize, Serialize};

/// Delivery channel registration for the device this deployment serves.
/// A registered push token routes notifications through the external push
/// provider; without one delivery is local-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRegistration {
    pub device_id: String,
    pub push_token: Option<String>,
    pub updated: i64,
}

impl DeviceRegistration {
    pub fn is_push_enabled(&self) -> bool {
        self.push_token.is_some()
    }
}
