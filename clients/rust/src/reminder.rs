use crate::{APIResponse, BaseClient};
use remedi_api_structs::*;
use remedi_domain::{ReminderAction, SchedulePreset, ID};
use reqwest::StatusCode;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminderInput {
    pub name: String,
    pub dosage: String,
    #[serde(default)]
    pub schedule: Option<SchedulePreset>,
    pub custom_time: bool,
    #[serde(default)]
    pub hours: Option<u32>,
    #[serde(default)]
    pub minutes: Option<u32>,
    pub recurring: bool,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateReminderInput,
    ) -> APIResponse<create_reminder::APIResponse> {
        let body = create_reminder::RequestBody {
            name: input.name,
            dosage: input.dosage,
            schedule: input.schedule,
            custom_time: input.custom_time,
            hours: input.hours,
            minutes: input.minutes,
            recurring: input.recurring,
        };

        self.base
            .post(body, "reminders".into(), StatusCode::CREATED)
            .await
    }

    pub async fn list(&self) -> APIResponse<get_reminders::APIResponse> {
        self.base.get("reminders".into(), StatusCode::OK).await
    }

    pub async fn delete(&self, reminder_id: ID) -> APIResponse<delete_reminder::APIResponse> {
        self.base
            .delete(format!("reminders/{}", reminder_id), StatusCode::OK)
            .await
    }

    pub async fn action(
        &self,
        reminder_id: ID,
        action: ReminderAction,
    ) -> APIResponse<handle_reminder_action::APIResponse> {
        let body = handle_reminder_action::RequestBody { action };
        self.base
            .post(
                body,
                format!("reminders/{}/action", reminder_id),
                StatusCode::OK,
            )
            .await
    }
}
