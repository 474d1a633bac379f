use crate::reminder::deliver_due_reminders::{DeliverDueRemindersUseCase, ReconciliationTrigger};
use crate::shared::usecase::execute;
use actix_web::rt::time::interval;
use remedi_infra::RemediContext;
use std::time::Duration;

/// Periodic delivery reconciliation. The first tick of the interval fires
/// immediately, which doubles as the application-start pass that picks up
/// reminders that came due while the process was down.
pub fn start_reconciliation_job(ctx: RemediContext) {
    actix_web::rt::spawn(async move {
        let mut tick = interval(Duration::from_secs(ctx.config.reconciliation_interval_secs));
        let mut trigger = ReconciliationTrigger::AppStart;
        loop {
            tick.tick().await;

            let usecase = DeliverDueRemindersUseCase { trigger };
            let _ = execute(usecase, &ctx).await;

            trigger = ReconciliationTrigger::JobScheduler;
        }
    });
}
