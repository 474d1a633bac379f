use crate::schedule::ReminderSchedule;
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// User response to a delivered notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderAction {
    Taken,
    Postpone,
}

/// Delivery progress of the current occurrence of a `Reminder`.
///
/// `Pending -> Delivered` is owned by the delivery reconciler,
/// `Delivered -> Acknowledged` by the action router. Postpone and
/// recurrence re-arming move an entry back to `Pending` with a new
/// fire time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "action", rename_all = "camelCase")]
pub enum DeliveryState {
    Pending,
    Delivered,
    Acknowledged(ReminderAction),
}

impl DeliveryState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    pub fn is_acknowledged(&self) -> bool {
        matches!(self, Self::Acknowledged(_))
    }
}

/// A medication alert definition. `medication_name` and `dosage` are fixed
/// at creation, only the scheduling fields mutate over the lifetime of the
/// entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ID,
    pub medication_name: String,
    pub dosage: String,
    pub schedule: ReminderSchedule,
    /// Recurring reminders re-arm to the same wall-clock time the next day
    /// after every delivery and never self-destruct.
    pub recurring: bool,
    pub next_fire_at: i64,
    pub delivery_state: DeliveryState,
    pub created: i64,
    pub updated: i64,
}

impl Reminder {
    pub fn is_due(&self, now: i64) -> bool {
        self.delivery_state.is_pending() && self.next_fire_at <= now
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::SchedulePreset;

    fn reminder(next_fire_at: i64, delivery_state: DeliveryState) -> Reminder {
        Reminder {
            id: Default::default(),
            medication_name: "Aspirin".into(),
            dosage: "1 tablet".into(),
            schedule: ReminderSchedule::Preset(SchedulePreset::Evening),
            recurring: false,
            next_fire_at,
            delivery_state,
            created: 0,
            updated: 0,
        }
    }

    #[test]
    fn due_at_or_after_fire_time_while_pending() {
        assert!(!reminder(100, DeliveryState::Pending).is_due(99));
        assert!(reminder(100, DeliveryState::Pending).is_due(100));
        assert!(reminder(100, DeliveryState::Pending).is_due(101));
    }

    #[test]
    fn delivered_and_acknowledged_entries_are_never_due() {
        assert!(!reminder(100, DeliveryState::Delivered).is_due(200));
        assert!(
            !reminder(100, DeliveryState::Acknowledged(ReminderAction::Taken)).is_due(200)
        );
    }
}
