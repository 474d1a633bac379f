mod local;
mod push;

use crate::config::Config;
use chrono::TimeZone;
pub use local::{LocalNotification, LocalNotifier, NotificationActionButton, NotificationData};
pub use push::{PushClient, PushPayload};
use remedi_domain::{Reminder, Tz, ID};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Notification permission has not been granted")]
    PermissionDenied,
    #[error("No push provider is configured")]
    PushNotConfigured,
    #[error("The push provider rejected the notification: {0}")]
    Provider(String),
    #[error("Network error while contacting the push provider: {0}")]
    Network(String),
}

/// What a delivery carries, independent of the channel it goes out on.
#[derive(Debug, Clone)]
pub struct ReminderNotification {
    pub reminder_id: ID,
    pub medication_name: String,
    pub dosage: String,
    pub fire_at: i64,
    pub time_display: String,
}

impl ReminderNotification {
    pub fn new(reminder: &Reminder, tz: &Tz) -> Self {
        let time_display = tz
            .timestamp_millis(reminder.next_fire_at)
            .format("%H:%M")
            .to_string();
        Self {
            reminder_id: reminder.id.clone(),
            medication_name: reminder.medication_name.clone(),
            dosage: reminder.dosage.clone(),
            fire_at: reminder.next_fire_at,
            time_display,
        }
    }
}

/// The two interchangeable delivery channels behind one entry point.
/// A registered push token routes through the external provider, otherwise
/// the notification is shown in-process.
#[derive(Clone)]
pub struct NotificationService {
    local: LocalNotifier,
    push: PushClient,
}

impl NotificationService {
    pub fn new(config: &Config) -> Self {
        Self {
            local: LocalNotifier::new(),
            push: PushClient::new(config),
        }
    }

    pub fn local(&self) -> &LocalNotifier {
        &self.local
    }

    pub async fn deliver(
        &self,
        notification: &ReminderNotification,
        push_token: Option<&str>,
    ) -> Result<(), DeliveryError> {
        match push_token {
            Some(token) => self.push.send(token, notification).await,
            None => self.local.show(notification),
        }
    }
}
