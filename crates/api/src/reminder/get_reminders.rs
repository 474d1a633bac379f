use crate::error::RemediError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use remedi_api_structs::get_reminders::*;
use remedi_domain::Reminder;
use remedi_infra::{IReminderRepo, RemediContext};

pub async fn get_reminders_controller(
    ctx: web::Data<RemediContext>,
) -> Result<HttpResponse, RemediError> {
    let usecase = GetRemindersUseCase {};

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(RemediError::from)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for RemediError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &RemediContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminders
            .find_all()
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
