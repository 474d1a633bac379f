mod base;
mod device;
mod message;
mod reminder;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
use device::DeviceClient;
pub use device::RegisterDeviceInput;
use message::MessageClient;
use reminder::ReminderClient;
pub use reminder::CreateReminderInput;
use status::StatusClient;
use std::sync::Arc;

pub use remedi_api_structs::dtos::*;
pub use remedi_api_structs::{Message, MessageOutcomeDTO};
pub use remedi_domain::{
    DeliveryState, ReminderAction, ReminderSchedule, SchedulePreset, ID,
};

/// Remedi Server SDK
///
/// The SDK contains methods for interacting with the Remedi server API.
#[derive(Clone)]
pub struct RemediSDK {
    pub device: DeviceClient,
    pub message: MessageClient,
    pub reminder: ReminderClient,
    pub status: StatusClient,
}

impl RemediSDK {
    pub fn new(address: String) -> Self {
        let base = Arc::new(BaseClient::new(address));
        let device = DeviceClient::new(base.clone());
        let message = MessageClient::new(base.clone());
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base);
        Self {
            device,
            message,
            reminder,
            status,
        }
    }
}
