use crate::error::RemediError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use remedi_api_structs::delete_reminder::*;
use remedi_domain::{Reminder, ID};
use remedi_infra::{IReminderRepo, RemediContext};

pub async fn delete_reminder_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<RemediContext>,
) -> Result<HttpResponse, RemediError> {
    let usecase = DeleteReminderUseCase {
        reminder_id: path_params.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(|_| RemediError::InternalError)
}

/// Deleting is idempotent: removing an id that is absent (for example
/// because a previous call already removed it) is not an error.
#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = Option<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &RemediContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx.repos.reminders.delete(&self.reminder_id).await)
    }
}
