use crate::dtos::{DeviceRegistrationDTO, ReminderDTO};
use remedi_domain::{ReminderAction, ID};
use serde::{Deserialize, Serialize};

/// The `{type, payload}` envelope the web client and the background jobs
/// both speak. Every message maps onto exactly one use case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Message {
    /// Scan for due reminders and deliver them. Sent by the client when
    /// the app returns to the foreground; the background tick and the
    /// startup pass dispatch it internally.
    Reconcile,
    /// A click on a notification action button.
    #[serde(rename_all = "camelCase")]
    ReminderAction {
        reminder_id: ID,
        action: ReminderAction,
    },
    #[serde(rename_all = "camelCase")]
    RegisterDevice {
        device_id: Option<String>,
        push_token: Option<String>,
    },
    /// The client reports the outcome of the notification permission
    /// prompt.
    #[serde(rename_all = "camelCase")]
    SetPermission { granted: bool },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageOutcomeDTO {
    #[serde(rename_all = "camelCase")]
    Reconciliation {
        delivered: usize,
        failed: usize,
        skipped: usize,
    },
    #[serde(rename_all = "camelCase")]
    ReminderActionHandled {
        reminder: ReminderDTO,
        applied: bool,
    },
    #[serde(rename_all = "camelCase")]
    DeviceRegistered { device: DeviceRegistrationDTO },
    #[serde(rename_all = "camelCase")]
    PermissionSet { granted: bool },
}

pub mod dispatch_message {
    use super::*;

    pub type RequestBody = Message;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub outcome: MessageOutcomeDTO,
    }
}
