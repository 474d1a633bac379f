use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use remedi_domain::{DeliveryState, Reminder, ReminderAction, ID};

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        save(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>> {
        Ok(find_by(&self.reminders, |_| true))
    }

    async fn find_due(&self, before: i64) -> anyhow::Result<Vec<Reminder>> {
        Ok(find_by(&self.reminders, |reminder| reminder.is_due(before)))
    }

    async fn begin_delivery(&self, reminder_id: &ID, fire_at: i64) -> anyhow::Result<bool> {
        Ok(update_if(reminder_id, &self.reminders, |reminder| {
            if reminder.delivery_state.is_pending() && reminder.next_fire_at == fire_at {
                reminder.delivery_state = DeliveryState::Delivered;
                true
            } else {
                false
            }
        }))
    }

    async fn reschedule(&self, reminder_id: &ID, next_fire_at: i64) -> anyhow::Result<bool> {
        Ok(update_if(reminder_id, &self.reminders, |reminder| {
            if reminder.delivery_state.is_acknowledged() {
                false
            } else {
                reminder.delivery_state = DeliveryState::Pending;
                reminder.next_fire_at = next_fire_at;
                true
            }
        }))
    }

    async fn acknowledge(&self, reminder_id: &ID, action: ReminderAction) -> anyhow::Result<bool> {
        Ok(update_if(reminder_id, &self.reminders, |reminder| {
            if reminder.delivery_state.is_delivered() {
                reminder.delivery_state = DeliveryState::Acknowledged(action);
                true
            } else {
                false
            }
        }))
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        delete(reminder_id, &self.reminders)
    }
}
