use crate::error::RemediError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use remedi_api_structs::register_device::*;
use remedi_domain::DeviceRegistration;
use remedi_infra::{IDeviceRepo, RemediContext};
use remedi_utils::create_random_secret;

pub async fn register_device_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<RemediContext>,
) -> Result<HttpResponse, RemediError> {
    let body = body.0;
    let usecase = RegisterDeviceUseCase {
        device_id: body.device_id,
        push_token: body.push_token,
    };

    execute(usecase, &ctx)
        .await
        .map(|device| HttpResponse::Ok().json(APIResponse::new(device)))
        .map_err(RemediError::from)
}

/// Upserts the delivery channel registration. With a push token the
/// reminders go through the external push provider, without one they fall
/// back to local delivery.
#[derive(Debug)]
pub struct RegisterDeviceUseCase {
    pub device_id: Option<String>,
    pub push_token: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for RemediError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RegisterDeviceUseCase {
    type Response = DeviceRegistration;

    type Error = UseCaseError;

    const NAME: &'static str = "RegisterDevice";

    async fn execute(&mut self, ctx: &RemediContext) -> Result<Self::Response, Self::Error> {
        let device_id = self
            .device_id
            .take()
            .unwrap_or_else(|| create_random_secret(16));

        let device = DeviceRegistration {
            device_id,
            push_token: self.push_token.clone(),
            updated: ctx.sys.get_timestamp_millis(),
        };

        ctx.repos
            .devices
            .set(&device)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(device)
    }
}
