use remedi_domain::DeviceRegistration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRegistrationDTO {
    pub device_id: String,
    pub push_token: Option<String>,
    pub updated: i64,
}

impl DeviceRegistrationDTO {
    pub fn new(device: DeviceRegistration) -> Self {
        Self {
            device_id: device.device_id,
            push_token: device.push_token,
            updated: device.updated,
        }
    }
}
