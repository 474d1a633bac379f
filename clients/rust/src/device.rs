use crate::{APIResponse, BaseClient};
use remedi_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct DeviceClient {
    base: Arc<BaseClient>,
}

pub struct RegisterDeviceInput {
    pub device_id: Option<String>,
    pub push_token: Option<String>,
}

impl DeviceClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn register(
        &self,
        input: RegisterDeviceInput,
    ) -> APIResponse<register_device::APIResponse> {
        let body = register_device::RequestBody {
            device_id: input.device_id,
            push_token: input.push_token,
        };
        self.base.post(body, "device".into(), StatusCode::OK).await
    }
}
