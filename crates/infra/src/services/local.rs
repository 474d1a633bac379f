use super::{DeliveryError, ReminderNotification};
use remedi_domain::{ReminderAction, ID};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

const NOTIFICATION_ICON: &str = "/icons/pill.png";
const CHANNEL_CAPACITY: usize = 64;

/// The shape handed to whatever surfaces in-process notifications.
/// Action buttons come back through the message dispatcher as
/// `{action, reminderId}` events; the notifier itself never interprets
/// them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub actions: Vec<NotificationActionButton>,
    pub data: NotificationData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationActionButton {
    pub action: ReminderAction,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    pub reminder_id: ID,
}

impl LocalNotification {
    fn new(notification: &ReminderNotification) -> Self {
        Self {
            title: notification.medication_name.clone(),
            body: format!(
                "Take {} at {}",
                notification.dosage, notification.time_display
            ),
            icon: NOTIFICATION_ICON.into(),
            actions: vec![
                NotificationActionButton {
                    action: ReminderAction::Taken,
                    title: "Taken".into(),
                },
                NotificationActionButton {
                    action: ReminderAction::Postpone,
                    title: "Postpone".into(),
                },
            ],
            data: NotificationData {
                reminder_id: notification.reminder_id.clone(),
            },
        }
    }
}

/// In-process delivery channel. Notifications are fanned out to attached
/// listeners; showing one without listeners still counts as delivered,
/// like a notification nobody is looking at. Only the permission gate can
/// make local delivery fail, and it fails fast without retrying.
#[derive(Clone)]
pub struct LocalNotifier {
    permission_granted: Arc<AtomicBool>,
    sender: broadcast::Sender<LocalNotification>,
}

impl LocalNotifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            permission_granted: Arc::new(AtomicBool::new(true)),
            sender,
        }
    }

    pub fn set_permission(&self, granted: bool) {
        self.permission_granted.store(granted, Ordering::SeqCst);
    }

    pub fn permission_granted(&self) -> bool {
        self.permission_granted.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LocalNotification> {
        self.sender.subscribe()
    }

    pub fn show(&self, notification: &ReminderNotification) -> Result<(), DeliveryError> {
        if !self.permission_granted() {
            return Err(DeliveryError::PermissionDenied);
        }
        // A send error only means there is no listener attached right now.
        let _ = self.sender.send(LocalNotification::new(notification));
        Ok(())
    }
}

impl Default for LocalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification() -> ReminderNotification {
        ReminderNotification {
            reminder_id: Default::default(),
            medication_name: "Aspirin".into(),
            dosage: "1 tablet".into(),
            fire_at: 0,
            time_display: "18:00".into(),
        }
    }

    #[tokio::test]
    async fn shows_notification_to_subscribers() {
        let notifier = LocalNotifier::new();
        let mut receiver = notifier.subscribe();

        notifier.show(&notification()).unwrap();

        let shown = receiver.recv().await.unwrap();
        assert_eq!(shown.title, "Aspirin");
        assert_eq!(shown.body, "Take 1 tablet at 18:00");
        assert_eq!(shown.actions.len(), 2);
    }

    #[test]
    fn fails_fast_without_permission() {
        let notifier = LocalNotifier::new();
        notifier.set_permission(false);

        match notifier.show(&notification()) {
            Err(DeliveryError::PermissionDenied) => {}
            other => panic!("Expected PermissionDenied, got: {:?}", other),
        }

        notifier.set_permission(true);
        assert!(notifier.show(&notification()).is_ok());
    }

    #[test]
    fn showing_without_listeners_is_still_delivered() {
        let notifier = LocalNotifier::new();
        assert!(notifier.show(&notification()).is_ok());
    }
}
