mod inmemory;
mod sqlite;

pub use inmemory::InMemoryReminderRepo;
use remedi_domain::{Reminder, ReminderAction, ID};
pub use sqlite::SqliteReminderRepo;

/// Storage for `Reminder` entities.
///
/// The state transitions (`begin_delivery`, `reschedule`, `acknowledge`)
/// are compare-and-set operations: they re-check the current state of the
/// entry atomically and report through their return value whether the
/// transition happened. Callers treat a `false` return as "someone else got
/// there first" (a concurrent reconciliation pass, an acknowledgement, or a
/// delete) and move on without error.
#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>>;
    /// All entries that are `Pending` with `next_fire_at <= before`.
    async fn find_due(&self, before: i64) -> anyhow::Result<Vec<Reminder>>;
    /// `Pending -> Delivered`, only if the entry still holds the occurrence
    /// `fire_at`. At most one caller can claim a given occurrence.
    async fn begin_delivery(&self, reminder_id: &ID, fire_at: i64) -> anyhow::Result<bool>;
    /// Back to `Pending` with a new fire time, unless the entry is missing
    /// or already acknowledged.
    async fn reschedule(&self, reminder_id: &ID, next_fire_at: i64) -> anyhow::Result<bool>;
    /// `Delivered -> Acknowledged(action)`; no-op on missing, pending or
    /// already-acknowledged entries.
    async fn acknowledge(&self, reminder_id: &ID, action: ReminderAction) -> anyhow::Result<bool>;
    /// Idempotent, returns the removed entry if there was one.
    async fn delete(&self, reminder_id: &ID) -> Option<Reminder>;
}
