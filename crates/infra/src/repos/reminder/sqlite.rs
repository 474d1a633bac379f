use super::IReminderRepo;
use anyhow::Context;
use remedi_domain::{DeliveryState, Reminder, ReminderAction, ReminderSchedule, ID};
use sqlx::SqlitePool;
use tracing::error;

pub struct SqliteReminderRepo {
    pool: SqlitePool,
}

impl SqliteReminderRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Row form of a `Reminder`. Rows are validated on the way out; a row that
/// does not parse into a well-formed domain entity is rejected and logged
/// instead of being coerced.
#[derive(Debug, sqlx::FromRow)]
struct ReminderRaw {
    reminder_uid: String,
    medication_name: String,
    dosage: String,
    schedule: String,
    recurring: bool,
    next_fire_at: i64,
    delivery_state: String,
    acknowledged_action: Option<String>,
    created: i64,
    updated: i64,
}

fn delivery_state_columns(state: &DeliveryState) -> (&'static str, Option<&'static str>) {
    match state {
        DeliveryState::Pending => ("pending", None),
        DeliveryState::Delivered => ("delivered", None),
        DeliveryState::Acknowledged(action) => ("acknowledged", Some(action_to_str(action))),
    }
}

fn action_to_str(action: &ReminderAction) -> &'static str {
    match action {
        ReminderAction::Taken => "taken",
        ReminderAction::Postpone => "postpone",
    }
}

fn action_from_str(action: &str) -> anyhow::Result<ReminderAction> {
    match action {
        "taken" => Ok(ReminderAction::Taken),
        "postpone" => Ok(ReminderAction::Postpone),
        _ => Err(anyhow::anyhow!("Unknown reminder action: {}", action)),
    }
}

impl ReminderRaw {
    fn try_into_domain(self) -> anyhow::Result<Reminder> {
        let id = self
            .reminder_uid
            .parse::<ID>()
            .context("Malformed reminder id")?;
        let schedule: ReminderSchedule =
            serde_json::from_str(&self.schedule).context("Malformed reminder schedule")?;
        if !schedule.is_valid() {
            return Err(anyhow::anyhow!(
                "Reminder schedule is out of bounds: {:?}",
                schedule
            ));
        }
        let delivery_state = match (self.delivery_state.as_str(), &self.acknowledged_action) {
            ("pending", _) => DeliveryState::Pending,
            ("delivered", _) => DeliveryState::Delivered,
            ("acknowledged", Some(action)) => DeliveryState::Acknowledged(action_from_str(action)?),
            (state, _) => {
                return Err(anyhow::anyhow!("Unknown delivery state: {}", state));
            }
        };

        Ok(Reminder {
            id,
            medication_name: self.medication_name,
            dosage: self.dosage,
            schedule,
            recurring: self.recurring,
            next_fire_at: self.next_fire_at,
            delivery_state,
            created: self.created,
            updated: self.updated,
        })
    }
}

fn into_domain_or_log(raw: ReminderRaw) -> Option<Reminder> {
    let uid = raw.reminder_uid.clone();
    match raw.try_into_domain() {
        Ok(reminder) => Some(reminder),
        Err(e) => {
            error!(
                "Rejecting malformed reminder record with id: {}. Err: {:?}",
                uid, e
            );
            None
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for SqliteReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let (state, action) = delivery_state_columns(&reminder.delivery_state);
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, medication_name, dosage, schedule, recurring,
             next_fire_at, delivery_state, acknowledged_action, created, updated)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(reminder.id.as_string())
        .bind(&reminder.medication_name)
        .bind(&reminder.dosage)
        .bind(serde_json::to_string(&reminder.schedule)?)
        .bind(reminder.recurring)
        .bind(reminder.next_fire_at)
        .bind(state)
        .bind(action)
        .bind(reminder.created)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let (state, action) = delivery_state_columns(&reminder.delivery_state);
        sqlx::query(
            r#"
            UPDATE reminders
            SET medication_name = ?, dosage = ?, schedule = ?, recurring = ?,
                next_fire_at = ?, delivery_state = ?, acknowledged_action = ?, updated = ?
            WHERE reminder_uid = ?
            "#,
        )
        .bind(&reminder.medication_name)
        .bind(&reminder.dosage)
        .bind(serde_json::to_string(&reminder.schedule)?)
        .bind(reminder.recurring)
        .bind(reminder.next_fire_at)
        .bind(state)
        .bind(action)
        .bind(reminder.updated)
        .bind(reminder.id.as_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        let raw: Option<ReminderRaw> =
            sqlx::query_as("SELECT * FROM reminders WHERE reminder_uid = ?")
                .bind(reminder_id.as_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    error!("Unable to find reminder with id: {}. Err: {:?}", reminder_id, e);
                    e
                })
                .ok()
                .flatten();
        raw.and_then(into_domain_or_log)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>> {
        let rows: Vec<ReminderRaw> = sqlx::query_as("SELECT * FROM reminders")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().filter_map(into_domain_or_log).collect())
    }

    async fn find_due(&self, before: i64) -> anyhow::Result<Vec<Reminder>> {
        let rows: Vec<ReminderRaw> = sqlx::query_as(
            "SELECT * FROM reminders WHERE delivery_state = 'pending' AND next_fire_at <= ?",
        )
        .bind(before)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().filter_map(into_domain_or_log).collect())
    }

    async fn begin_delivery(&self, reminder_id: &ID, fire_at: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET delivery_state = 'delivered'
            WHERE reminder_uid = ? AND delivery_state = 'pending' AND next_fire_at = ?
            "#,
        )
        .bind(reminder_id.as_string())
        .bind(fire_at)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn reschedule(&self, reminder_id: &ID, next_fire_at: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET delivery_state = 'pending', acknowledged_action = NULL, next_fire_at = ?
            WHERE reminder_uid = ? AND delivery_state != 'acknowledged'
            "#,
        )
        .bind(next_fire_at)
        .bind(reminder_id.as_string())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn acknowledge(&self, reminder_id: &ID, action: ReminderAction) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET delivery_state = 'acknowledged', acknowledged_action = ?
            WHERE reminder_uid = ? AND delivery_state = 'delivered'
            "#,
        )
        .bind(action_to_str(&action))
        .bind(reminder_id.as_string())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        let deleted = self.find(reminder_id).await;
        if deleted.is_some() {
            if let Err(e) = sqlx::query("DELETE FROM reminders WHERE reminder_uid = ?")
                .bind(reminder_id.as_string())
                .execute(&self.pool)
                .await
            {
                error!(
                    "Unable to delete reminder with id: {}. Err: {:?}",
                    reminder_id, e
                );
                return None;
            }
        }
        deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::connect_pool;
    use remedi_domain::SchedulePreset;

    async fn repo() -> SqliteReminderRepo {
        let pool = connect_pool("sqlite::memory:")
            .await
            .expect("In-memory sqlite pool");
        SqliteReminderRepo::new(pool)
    }

    fn reminder(fire_at: i64) -> Reminder {
        Reminder {
            id: Default::default(),
            medication_name: "Aspirin".into(),
            dosage: "1 tablet".into(),
            schedule: ReminderSchedule::Preset(SchedulePreset::Evening),
            recurring: true,
            next_fire_at: fire_at,
            delivery_state: DeliveryState::Pending,
            created: 0,
            updated: 0,
        }
    }

    #[tokio::test]
    async fn roundtrips_reminder_entity() {
        let repo = repo().await;
        let r = reminder(100);
        repo.insert(&r).await.unwrap();

        assert_eq!(repo.find(&r.id).await, Some(r.clone()));
        assert_eq!(repo.find_all().await.unwrap(), vec![r]);
    }

    #[tokio::test]
    async fn claim_is_atomic_per_occurrence() {
        let repo = repo().await;
        let r = reminder(100);
        repo.insert(&r).await.unwrap();

        assert!(repo.begin_delivery(&r.id, 100).await.unwrap());
        assert!(!repo.begin_delivery(&r.id, 100).await.unwrap());

        assert!(repo.reschedule(&r.id, 200).await.unwrap());
        assert!(!repo.begin_delivery(&r.id, 100).await.unwrap());
        assert!(repo.begin_delivery(&r.id, 200).await.unwrap());
    }

    #[tokio::test]
    async fn acknowledge_requires_a_delivered_entry() {
        let repo = repo().await;
        let r = reminder(100);
        repo.insert(&r).await.unwrap();

        assert!(!repo.acknowledge(&r.id, ReminderAction::Taken).await.unwrap());
        assert!(repo.begin_delivery(&r.id, 100).await.unwrap());
        assert!(repo.acknowledge(&r.id, ReminderAction::Taken).await.unwrap());
        assert!(!repo.acknowledge(&r.id, ReminderAction::Taken).await.unwrap());

        assert!(!repo.reschedule(&r.id, 300).await.unwrap());
        let stored = repo.find(&r.id).await.unwrap();
        assert_eq!(
            stored.delivery_state,
            DeliveryState::Acknowledged(ReminderAction::Taken)
        );
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = repo().await;
        let r = reminder(100);
        repo.insert(&r).await.unwrap();

        assert!(repo.delete(&r.id).await.is_some());
        assert!(repo.delete(&r.id).await.is_none());
        assert!(!repo.reschedule(&r.id, 200).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_records_are_rejected_on_read() {
        let repo = repo().await;
        let good = reminder(100);
        repo.insert(&good).await.unwrap();

        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, medication_name, dosage, schedule, recurring,
             next_fire_at, delivery_state, acknowledged_action, created, updated)
            VALUES ('not-a-uuid', 'Ibuprofen', '2 tablets', 'gibberish', 1, 50, 'pending', NULL, 0, 0)
            "#,
        )
        .execute(&repo.pool)
        .await
        .unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all, vec![good.clone()]);
        let due = repo.find_due(200).await.unwrap();
        assert_eq!(due, vec![good]);
    }
}
