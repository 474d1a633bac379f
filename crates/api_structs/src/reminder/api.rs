use crate::dtos::ReminderDTO;
use remedi_domain::{Reminder, ReminderAction, SchedulePreset, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

pub mod create_reminder {
    use super::*;

    /// The creation fields the web client has always sent: a named preset
    /// by default, or an explicit `hours`/`minutes` pair when `customTime`
    /// is set.
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
        pub dosage: String,
        pub schedule: Option<SchedulePreset>,
        #[serde(default)]
        pub custom_time: bool,
        pub hours: Option<u32>,
        pub minutes: Option<u32>,
        pub recurring: bool,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminders {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<Reminder>) -> Self {
            Self {
                reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
            }
        }
    }
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminder: Option<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminder: Option<Reminder>) -> Self {
            Self {
                reminder: reminder.map(ReminderDTO::new),
            }
        }
    }
}

pub mod handle_reminder_action {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub action: ReminderAction,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminder: ReminderDTO,
        /// False when the call was absorbed as an idempotent no-op.
        pub applied: bool,
    }

    impl APIResponse {
        pub fn new(reminder: Reminder, applied: bool) -> Self {
            Self {
                reminder: ReminderDTO::new(reminder),
                applied,
            }
        }
    }
}
