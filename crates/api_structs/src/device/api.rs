use crate::dtos::DeviceRegistrationDTO;
use remedi_domain::DeviceRegistration;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub device: DeviceRegistrationDTO,
}

impl DeviceResponse {
    pub fn new(device: DeviceRegistration) -> Self {
        Self {
            device: DeviceRegistrationDTO::new(device),
        }
    }
}

pub mod register_device {
    use super::*;

    /// Missing `deviceId` asks the server to generate one; a null
    /// `pushToken` reverts the device to local-only delivery.
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub device_id: Option<String>,
        pub push_token: Option<String>,
    }

    pub type APIResponse = DeviceResponse;
}
