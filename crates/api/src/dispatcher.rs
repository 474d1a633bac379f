use crate::device::register_device::RegisterDeviceUseCase;
use crate::error::RemediError;
use crate::reminder::deliver_due_reminders::{DeliverDueRemindersUseCase, ReconciliationTrigger};
use crate::reminder::handle_reminder_action::HandleReminderActionUseCase;
use crate::shared::usecase::execute;
use actix_web::{web, HttpResponse};
use remedi_api_structs::dispatch_message::APIResponse;
use remedi_api_structs::dtos::{DeviceRegistrationDTO, ReminderDTO};
use remedi_api_structs::{Message, MessageOutcomeDTO};
use remedi_infra::RemediContext;

pub async fn post_message_controller(
    body: web::Json<Message>,
    ctx: web::Data<RemediContext>,
) -> Result<HttpResponse, RemediError> {
    let outcome = dispatch(body.0, &ctx).await?;
    Ok(HttpResponse::Ok().json(APIResponse { outcome }))
}

/// Single entry point for the `{type, payload}` messages coming from the
/// web client: each message maps to exactly one use case.
pub async fn dispatch(
    message: Message,
    ctx: &RemediContext,
) -> Result<MessageOutcomeDTO, RemediError> {
    match message {
        Message::Reconcile => {
            let usecase = DeliverDueRemindersUseCase {
                trigger: ReconciliationTrigger::Foreground,
            };
            let report = execute(usecase, ctx)
                .await
                .map_err(|_| RemediError::InternalError)?;
            Ok(MessageOutcomeDTO::Reconciliation {
                delivered: report.delivered,
                failed: report.failed,
                skipped: report.skipped,
            })
        }
        Message::ReminderAction {
            reminder_id,
            action,
        } => {
            let usecase = HandleReminderActionUseCase {
                reminder_id,
                action,
            };
            let outcome = execute(usecase, ctx).await.map_err(RemediError::from)?;
            Ok(MessageOutcomeDTO::ReminderActionHandled {
                reminder: ReminderDTO::new(outcome.reminder),
                applied: outcome.applied,
            })
        }
        Message::RegisterDevice {
            device_id,
            push_token,
        } => {
            let usecase = RegisterDeviceUseCase {
                device_id,
                push_token,
            };
            let device = execute(usecase, ctx).await.map_err(RemediError::from)?;
            Ok(MessageOutcomeDTO::DeviceRegistered {
                device: DeviceRegistrationDTO::new(device),
            })
        }
        Message::SetPermission { granted } => {
            ctx.notifier.local().set_permission(granted);
            Ok(MessageOutcomeDTO::PermissionSet { granted })
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/messages", web::post().to(post_message_controller));
}

#[cfg(test)]
mod tests {
    use super::*;
    use remedi_domain::{
        DeliveryState, Reminder, ReminderAction, ReminderSchedule, SchedulePreset,
    };
    use remedi_infra::IReminderRepo;

    fn delivered_reminder() -> Reminder {
        Reminder {
            id: Default::default(),
            medication_name: "Aspirin".into(),
            dosage: "1 tablet".into(),
            schedule: ReminderSchedule::Preset(SchedulePreset::Morning),
            recurring: false,
            next_fire_at: 100,
            delivery_state: DeliveryState::Delivered,
            created: 0,
            updated: 0,
        }
    }

    #[actix_web::test]
    async fn routes_action_messages_to_the_action_router() {
        let ctx = RemediContext::create_inmemory();
        let r = delivered_reminder();
        ctx.repos.reminders.insert(&r).await.unwrap();

        let message = Message::ReminderAction {
            reminder_id: r.id.clone(),
            action: ReminderAction::Taken,
        };
        let outcome = dispatch(message, &ctx).await.unwrap();

        match outcome {
            MessageOutcomeDTO::ReminderActionHandled { applied, .. } => assert!(applied),
            other => panic!("Unexpected outcome: {:?}", other),
        }
        let stored = ctx.repos.reminders.find(&r.id).await.unwrap();
        assert_eq!(
            stored.delivery_state,
            DeliveryState::Acknowledged(ReminderAction::Taken)
        );
    }

    #[actix_web::test]
    async fn permission_messages_toggle_the_local_channel() {
        let ctx = RemediContext::create_inmemory();
        assert!(ctx.notifier.local().permission_granted());

        let outcome = dispatch(Message::SetPermission { granted: false }, &ctx)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            MessageOutcomeDTO::PermissionSet { granted: false }
        ));
        assert!(!ctx.notifier.local().permission_granted());
    }

    #[actix_web::test]
    async fn reconcile_messages_run_a_reconciliation_pass() {
        let ctx = RemediContext::create_inmemory();

        let outcome = dispatch(Message::Reconcile, &ctx).await.unwrap();
        assert!(matches!(
            outcome,
            MessageOutcomeDTO::Reconciliation {
                delivered: 0,
                failed: 0,
                skipped: 0
            }
        ));
    }
}
