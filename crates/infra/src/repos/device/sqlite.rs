use super::IDeviceRepo;
use remedi_domain::DeviceRegistration;
use sqlx::SqlitePool;

pub struct SqliteDeviceRepo {
    pool: SqlitePool,
}

impl SqliteDeviceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DeviceRegistrationRaw {
    device_uid: String,
    push_token: Option<String>,
    updated: i64,
}

impl From<DeviceRegistrationRaw> for DeviceRegistration {
    fn from(raw: DeviceRegistrationRaw) -> Self {
        Self {
            device_id: raw.device_uid,
            push_token: raw.push_token,
            updated: raw.updated,
        }
    }
}

#[async_trait::async_trait]
impl IDeviceRepo for SqliteDeviceRepo {
    async fn set(&self, device: &DeviceRegistration) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM device_registrations")
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO device_registrations (device_uid, push_token, updated) VALUES (?, ?, ?)",
        )
        .bind(&device.device_id)
        .bind(&device.push_token)
        .bind(device.updated)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get(&self) -> anyhow::Result<Option<DeviceRegistration>> {
        let raw: Option<DeviceRegistrationRaw> =
            sqlx::query_as("SELECT * FROM device_registrations LIMIT 1")
                .fetch_optional(&self.pool)
                .await?;
        Ok(raw.map(Into::into))
    }

    async fn clear(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM device_registrations")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
