use remedi_domain::{DeliveryState, Reminder, ReminderSchedule, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub medication_name: String,
    pub dosage: String,
    pub schedule: ReminderSchedule,
    pub recurring: bool,
    pub next_fire_at: i64,
    pub delivery_state: DeliveryState,
    pub created: i64,
    pub updated: i64,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id.clone(),
            medication_name: reminder.medication_name,
            dosage: reminder.dosage,
            schedule: reminder.schedule,
            recurring: reminder.recurring,
            next_fire_at: reminder.next_fire_at,
            delivery_state: reminder.delivery_state,
            created: reminder.created,
            updated: reminder.updated,
        }
    }
}
