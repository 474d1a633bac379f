use crate::error::RemediError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use remedi_api_structs::handle_reminder_action::*;
use remedi_domain::{Reminder, ReminderAction, ID};
use remedi_infra::{IReminderRepo, RemediContext};

pub async fn handle_reminder_action_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<RemediContext>,
) -> Result<HttpResponse, RemediError> {
    let usecase = HandleReminderActionUseCase {
        reminder_id: path_params.reminder_id.clone(),
        action: body.action,
    };

    execute(usecase, &ctx)
        .await
        .map(|outcome| {
            HttpResponse::Ok().json(APIResponse::new(outcome.reminder, outcome.applied))
        })
        .map_err(RemediError::from)
}

/// Routes a notification action back into the store. Safe to call any
/// number of times for the same occurrence: once an entry is acknowledged,
/// every further action on it is absorbed as a no-op.
#[derive(Debug)]
pub struct HandleReminderActionUseCase {
    pub reminder_id: ID,
    pub action: ReminderAction,
}

#[derive(Debug)]
pub struct ActionOutcome {
    pub reminder: Reminder,
    pub applied: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for RemediError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for HandleReminderActionUseCase {
    type Response = ActionOutcome;

    type Error = UseCaseError;

    const NAME: &'static str = "HandleReminderAction";

    async fn execute(&mut self, ctx: &RemediContext) -> Result<Self::Response, Self::Error> {
        let reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;

        let applied = match self.action {
            ReminderAction::Taken => {
                if reminder.delivery_state.is_delivered() {
                    ctx.repos
                        .reminders
                        .acknowledge(&self.reminder_id, ReminderAction::Taken)
                        .await
                        .map_err(|_| UseCaseError::StorageError)?
                } else {
                    // Either already acknowledged, or a recurring entry the
                    // reconciler re-armed for tomorrow right after the
                    // delivery. Both are idempotent no-ops.
                    false
                }
            }
            ReminderAction::Postpone => {
                if reminder.delivery_state.is_acknowledged() {
                    false
                } else {
                    let next_fire_at = ctx.sys.get_timestamp_millis()
                        + ctx.config.postpone_minutes * 60 * 1000;
                    ctx.repos
                        .reminders
                        .reschedule(&self.reminder_id, next_fire_at)
                        .await
                        .map_err(|_| UseCaseError::StorageError)?
                }
            }
        };

        let reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;

        Ok(ActionOutcome { reminder, applied })
    }
}
