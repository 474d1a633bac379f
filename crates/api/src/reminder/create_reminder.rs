use crate::error::RemediError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use remedi_api_structs::create_reminder::*;
use remedi_domain::{compute_next_fire_time, DeliveryState, Reminder, ReminderSchedule};
use remedi_infra::{IReminderRepo, RemediContext};

pub async fn create_reminder_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<RemediContext>,
) -> Result<HttpResponse, RemediError> {
    let body = body.0;
    let schedule = match (body.custom_time, body.hours, body.minutes, body.schedule) {
        (true, Some(hours), Some(minutes), _) => ReminderSchedule::Explicit { hours, minutes },
        (true, _, _, _) => {
            return Err(RemediError::BadClientData(
                "customTime requires both hours and minutes to be set".into(),
            ))
        }
        (false, _, _, Some(preset)) => ReminderSchedule::Preset(preset),
        (false, _, _, None) => {
            return Err(RemediError::BadClientData(
                "Either a schedule preset or a custom time must be provided".into(),
            ))
        }
    };

    let usecase = CreateReminderUseCase {
        medication_name: body.name,
        dosage: body.dosage,
        schedule,
        recurring: body.recurring,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(RemediError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub medication_name: String,
    pub dosage: String,
    pub schedule: ReminderSchedule,
    pub recurring: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidSchedule,
    StorageError,
}

impl From<UseCaseError> for RemediError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidSchedule => {
                Self::BadClientData("Invalid schedule specified for the reminder".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &RemediContext) -> Result<Self::Response, Self::Error> {
        if !self.schedule.is_valid() {
            return Err(UseCaseError::InvalidSchedule);
        }

        let now = ctx.sys.get_timestamp_millis();
        let reminder = Reminder {
            id: Default::default(),
            medication_name: self.medication_name.clone(),
            dosage: self.dosage.clone(),
            schedule: self.schedule.clone(),
            recurring: self.recurring,
            next_fire_at: compute_next_fire_time(&self.schedule, now, &ctx.config.timezone),
            delivery_state: DeliveryState::Pending,
            created: now,
            updated: now,
        };

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::prelude::*;
    use chrono_tz::UTC;
    use remedi_domain::SchedulePreset;
    use remedi_infra::ISys;
    use std::sync::Arc;

    struct StaticTimeSys {
        now: i64,
    }
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.now
        }
    }

    fn setup_context(now: i64) -> RemediContext {
        let mut ctx = RemediContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys { now });
        ctx
    }

    #[actix_web::test]
    async fn creates_pending_reminder_with_first_occurrence() {
        let now = UTC.ymd(2024, 1, 1).and_hms(10, 0, 0).timestamp_millis();
        let ctx = setup_context(now);

        let usecase = CreateReminderUseCase {
            medication_name: "Aspirin".into(),
            dosage: "1 tablet".into(),
            schedule: ReminderSchedule::Preset(SchedulePreset::Evening),
            recurring: true,
        };
        let reminder = execute(usecase, &ctx).await.unwrap();

        assert_eq!(reminder.delivery_state, DeliveryState::Pending);
        assert_eq!(
            reminder.next_fire_at,
            UTC.ymd(2024, 1, 1).and_hms(18, 0, 0).timestamp_millis()
        );

        let stored = ctx.repos.reminders.find(&reminder.id).await;
        assert_eq!(stored, Some(reminder));
    }

    #[actix_web::test]
    async fn rejects_out_of_bounds_explicit_time() {
        let ctx = setup_context(0);

        let usecase = CreateReminderUseCase {
            medication_name: "Aspirin".into(),
            dosage: "1 tablet".into(),
            schedule: ReminderSchedule::Explicit {
                hours: 24,
                minutes: 0,
            },
            recurring: false,
        };
        let res = execute(usecase, &ctx).await;

        assert_eq!(res.unwrap_err(), UseCaseError::InvalidSchedule);
        assert!(ctx.repos.reminders.find_all().await.unwrap().is_empty());
    }
}
