use crate::shared::usecase::UseCase;
use futures::future::join_all;
use remedi_domain::{compute_next_fire_time, Reminder};
use remedi_infra::{IDeviceRepo, IReminderRepo, RemediContext, ReminderNotification};
use tracing::{error, info};

/// What kicked off a reconciliation pass. Only used for diagnostics, the
/// algorithm is identical for all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationTrigger {
    AppStart,
    JobScheduler,
    Foreground,
}

/// Scans the store for due reminders and delivers each of them at most
/// once. This is the only place that moves an entry `Pending -> Delivered`.
#[derive(Debug)]
pub struct DeliverDueRemindersUseCase {
    pub trigger: ReconciliationTrigger,
}

#[derive(Debug, Default, PartialEq)]
pub struct ReconciliationReport {
    pub delivered: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug)]
pub enum UseCaseError {}

enum DeliveryOutcome {
    Delivered,
    Failed,
    Skipped,
}

async fn deliver_reminder(
    reminder: Reminder,
    push_token: Option<&str>,
    ctx: &RemediContext,
) -> DeliveryOutcome {
    let occurrence = reminder.next_fire_at;

    // Claim the occurrence before handing it to the sink. A concurrent
    // pass working from the same due set loses this compare-and-set and
    // skips the entry, so no occurrence is ever delivered twice.
    match ctx.repos.reminders.begin_delivery(&reminder.id, occurrence).await {
        Ok(true) => {}
        Ok(false) => return DeliveryOutcome::Skipped,
        Err(e) => {
            error!(
                "Unable to claim reminder with id: {} for delivery. Err: {:?}",
                reminder.id, e
            );
            return DeliveryOutcome::Failed;
        }
    }

    let notification = ReminderNotification::new(&reminder, &ctx.config.timezone);
    match ctx.notifier.deliver(&notification, push_token).await {
        Ok(()) => {
            if reminder.recurring {
                let delivered_at = ctx.sys.get_timestamp_millis();
                let next_fire_at =
                    compute_next_fire_time(&reminder.schedule, delivered_at, &ctx.config.timezone);
                match ctx.repos.reminders.reschedule(&reminder.id, next_fire_at).await {
                    // The entry was deleted or acknowledged while the
                    // delivery was in flight, nothing left to re-arm.
                    Ok(_) => {}
                    Err(e) => {
                        error!(
                            "Unable to re-arm recurring reminder with id: {}. Err: {:?}",
                            reminder.id, e
                        );
                    }
                }
            }
            DeliveryOutcome::Delivered
        }
        Err(e) => {
            error!(
                "Unable to deliver reminder with id: {}. Err: {:?}",
                reminder.id, e
            );
            // Give the occurrence back so the next pass retries it. A
            // failed revert means the entry is gone, which is fine.
            if let Err(e) = ctx.repos.reminders.reschedule(&reminder.id, occurrence).await {
                error!(
                    "Unable to revert claim of reminder with id: {}. Err: {:?}",
                    reminder.id, e
                );
            }
            DeliveryOutcome::Failed
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeliverDueRemindersUseCase {
    type Response = ReconciliationReport;

    type Error = UseCaseError;

    const NAME: &'static str = "DeliverDueReminders";

    async fn execute(&mut self, ctx: &RemediContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();

        // An unreachable store never crashes a pass, it only makes this
        // pass see no due reminders. The next pass starts from scratch.
        let due = match ctx.repos.reminders.find_due(now).await {
            Ok(due) => due,
            Err(e) => {
                error!(
                    "Unable to fetch due reminders, skipping reconciliation pass. Err: {:?}",
                    e
                );
                return Ok(ReconciliationReport::default());
            }
        };
        if due.is_empty() {
            return Ok(ReconciliationReport::default());
        }

        let push_token = match ctx.repos.devices.get().await {
            Ok(device) => device.and_then(|d| d.push_token),
            Err(e) => {
                error!(
                    "Unable to fetch the device registration, falling back to local delivery. Err: {:?}",
                    e
                );
                None
            }
        };

        // Each delivery is an independent asynchronous unit. A failure
        // only affects its own entry, never the rest of the due set.
        let outcomes = join_all(
            due.into_iter()
                .map(|reminder| deliver_reminder(reminder, push_token.as_deref(), ctx)),
        )
        .await;

        let mut report = ReconciliationReport::default();
        for outcome in outcomes {
            match outcome {
                DeliveryOutcome::Delivered => report.delivered += 1,
                DeliveryOutcome::Failed => report.failed += 1,
                DeliveryOutcome::Skipped => report.skipped += 1,
            }
        }

        info!(
            "Reconciliation pass triggered by {:?} delivered {} reminder(s), {} failed, {} skipped",
            self.trigger, report.delivered, report.failed, report.skipped
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::prelude::*;
    use chrono_tz::UTC;
    use remedi_domain::{
        DeliveryState, DeviceRegistration, ReminderSchedule, SchedulePreset,
    };
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

    fn set_now(ctx: &mut RemediContext, now: i64) {
        ctx.sys = Arc::new(StaticTimeSys { now });
    }

    fn ts(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> i64 {
        UTC.ymd(year, month, day)
            .and_hms(hour, min, sec)
            .timestamp_millis()
    }

    fn reminder(schedule: ReminderSchedule, recurring: bool, next_fire_at: i64) -> Reminder {
        Reminder {
            id: Default::default(),
            medication_name: "Aspirin".into(),
            dosage: "1 tablet".into(),
            schedule,
            recurring,
            next_fire_at,
            delivery_state: DeliveryState::Pending,
            created: 0,
            updated: 0,
        }
    }

    async fn reconcile(ctx: &RemediContext) -> ReconciliationReport {
        let usecase = DeliverDueRemindersUseCase {
            trigger: ReconciliationTrigger::JobScheduler,
        };
        execute(usecase, ctx).await.unwrap()
    }

    #[actix_web::test]
    async fn delivers_due_recurring_reminder_and_rearms_it_for_the_next_day() {
        let evening = ReminderSchedule::Preset(SchedulePreset::Evening);
        let mut ctx = setup_context(ts(2024, 1, 1, 10, 0, 0));
        let r = reminder(evening.clone(), true, ts(2024, 1, 1, 18, 0, 0));
        ctx.repos.reminders.insert(&r).await.unwrap();
        let mut shown = ctx.notifier.local().subscribe();

        // Nothing is due yet.
        assert_eq!(reconcile(&ctx).await, ReconciliationReport::default());

        set_now(&mut ctx, ts(2024, 1, 1, 18, 0, 1));
        let report = reconcile(&ctx).await;
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 0);

        let notification = shown.try_recv().unwrap();
        assert_eq!(notification.title, "Aspirin");

        let stored = ctx.repos.reminders.find(&r.id).await.unwrap();
        assert_eq!(stored.delivery_state, DeliveryState::Pending);
        assert_eq!(stored.next_fire_at, ts(2024, 1, 2, 18, 0, 0));
    }

    #[actix_web::test]
    async fn non_recurring_reminder_stays_delivered() {
        let mut ctx = setup_context(ts(2024, 1, 1, 7, 0, 0));
        let r = reminder(
            ReminderSchedule::Preset(SchedulePreset::Morning),
            false,
            ts(2024, 1, 1, 8, 0, 0),
        );
        ctx.repos.reminders.insert(&r).await.unwrap();

        set_now(&mut ctx, ts(2024, 1, 1, 8, 0, 0));
        assert_eq!(reconcile(&ctx).await.delivered, 1);

        let stored = ctx.repos.reminders.find(&r.id).await.unwrap();
        assert_eq!(stored.delivery_state, DeliveryState::Delivered);
        assert_eq!(stored.next_fire_at, ts(2024, 1, 1, 8, 0, 0));

        // A second pass has nothing left to deliver.
        assert_eq!(reconcile(&ctx).await, ReconciliationReport::default());
    }

    #[actix_web::test]
    async fn occurrence_claimed_by_a_concurrent_pass_is_skipped() {
        let ctx = setup_context(200);
        let r = reminder(
            ReminderSchedule::Explicit {
                hours: 8,
                minutes: 0,
            },
            false,
            100,
        );
        ctx.repos.reminders.insert(&r).await.unwrap();
        let mut shown = ctx.notifier.local().subscribe();

        // Another pass got hold of the same due set and claimed the entry
        // between our scan and our claim.
        assert!(ctx.repos.reminders.begin_delivery(&r.id, 100).await.unwrap());

        let report = reconcile(&ctx).await;
        assert_eq!(report.delivered, 0);
        assert_eq!(report.skipped, 0);

        // The entry was no longer pending when the pass scanned, so no
        // notification went out for it at all.
        assert!(shown.try_recv().is_err());
    }

    #[actix_web::test]
    async fn failed_delivery_leaves_the_occurrence_pending_for_the_next_pass() {
        let mut ctx = setup_context(ts(2024, 1, 1, 8, 30, 0));
        let r = reminder(
            ReminderSchedule::Preset(SchedulePreset::Morning),
            true,
            ts(2024, 1, 1, 8, 0, 0),
        );
        ctx.repos.reminders.insert(&r).await.unwrap();
        ctx.notifier.local().set_permission(false);

        let report = reconcile(&ctx).await;
        assert_eq!(report.delivered, 0);
        assert_eq!(report.failed, 1);

        let stored = ctx.repos.reminders.find(&r.id).await.unwrap();
        assert_eq!(stored.delivery_state, DeliveryState::Pending);
        assert_eq!(stored.next_fire_at, ts(2024, 1, 1, 8, 0, 0));

        // Permission comes back, the next tick retries the same occurrence.
        ctx.notifier.local().set_permission(true);
        set_now(&mut ctx, ts(2024, 1, 1, 8, 31, 0));
        let report = reconcile(&ctx).await;
        assert_eq!(report.delivered, 1);

        let stored = ctx.repos.reminders.find(&r.id).await.unwrap();
        assert_eq!(stored.next_fire_at, ts(2024, 1, 2, 8, 0, 0));
    }

    #[actix_web::test]
    async fn per_entry_failures_do_not_affect_other_due_reminders() {
        // A registered push token without a configured provider makes the
        // push channel fail every delivery, for every entry alike, while
        // the pass itself keeps going.
        let ctx = setup_context(300);
        ctx.repos
            .devices
            .set(&DeviceRegistration {
                device_id: "device-1".into(),
                push_token: Some("token-1".into()),
                updated: 0,
            })
            .await
            .unwrap();

        let r1 = reminder(
            ReminderSchedule::Explicit {
                hours: 8,
                minutes: 0,
            },
            false,
            100,
        );
        let r2 = reminder(
            ReminderSchedule::Explicit {
                hours: 9,
                minutes: 0,
            },
            false,
            200,
        );
        ctx.repos.reminders.insert(&r1).await.unwrap();
        ctx.repos.reminders.insert(&r2).await.unwrap();

        let report = reconcile(&ctx).await;
        assert_eq!(report.delivered, 0);
        assert_eq!(report.failed, 2);

        for id in &[r1.id, r2.id] {
            let stored = ctx.repos.reminders.find(id).await.unwrap();
            assert_eq!(stored.delivery_state, DeliveryState::Pending);
        }
    }

    #[actix_web::test]
    async fn late_occurrence_is_delivered_once_without_catching_up() {
        // The process was down for three days past the fire time. One
        // delivery goes out and a recurring entry re-arms relative to the
        // delivery time, not the missed days.
        let evening = ReminderSchedule::Preset(SchedulePreset::Evening);
        let ctx = setup_context(ts(2024, 1, 4, 12, 0, 0));
        let r = reminder(evening, true, ts(2024, 1, 1, 18, 0, 0));
        ctx.repos.reminders.insert(&r).await.unwrap();
        let mut shown = ctx.notifier.local().subscribe();

        let report = reconcile(&ctx).await;
        assert_eq!(report.delivered, 1);

        assert!(shown.try_recv().is_ok());
        assert!(shown.try_recv().is_err());

        let stored = ctx.repos.reminders.find(&r.id).await.unwrap();
        assert_eq!(stored.next_fire_at, ts(2024, 1, 4, 18, 0, 0));
    }

    #[actix_web::test]
    async fn reminder_deleted_before_the_pass_is_not_delivered() {
        let ctx = setup_context(200);
        let r = reminder(
            ReminderSchedule::Explicit {
                hours: 8,
                minutes: 0,
            },
            false,
            100,
        );
        ctx.repos.reminders.insert(&r).await.unwrap();
        ctx.repos.reminders.delete(&r.id).await.unwrap();

        assert_eq!(reconcile(&ctx).await, ReconciliationReport::default());
        assert_eq!(ctx.repos.reminders.find(&r.id).await, None);
    }
}
