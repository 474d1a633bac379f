use super::{DeliveryError, ReminderNotification};
use crate::config::Config;
use remedi_domain::ID;
use serde::Serialize;

/// Wire payload of the push provider's scheduled-send endpoint. The field
/// names are the provider contract and must not change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    pub token: String,
    pub schedule_time: i64,
    pub medication_name: String,
    pub dosage: String,
    pub time_display: String,
    pub medication_id: ID,
}

/// Remote delivery channel. Hands the notification off to the external
/// push provider; anything after that is covered by the provider's own
/// delivery guarantees, not ours.
#[derive(Clone)]
pub struct PushClient {
    client: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
}

impl PushClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.push_api_url.clone(),
            api_key: config.push_api_key.clone(),
        }
    }

    pub async fn send(
        &self,
        token: &str,
        notification: &ReminderNotification,
    ) -> Result<(), DeliveryError> {
        let api_url = self.api_url.as_ref().ok_or(DeliveryError::PushNotConfigured)?;

        let payload = PushPayload {
            token: token.to_string(),
            schedule_time: notification.fire_at,
            medication_name: notification.medication_name.clone(),
            dosage: notification.dosage.clone(),
            time_display: notification.time_display.clone(),
            medication_id: notification.reminder_id.clone(),
        };

        let mut request = self.client.post(api_url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DeliveryError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Provider(format!(
                "unexpected status code: {}",
                response.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_keeps_the_provider_field_names() {
        let payload = PushPayload {
            token: "t".into(),
            schedule_time: 1,
            medication_name: "Aspirin".into(),
            dosage: "1 tablet".into(),
            time_display: "18:00".into(),
            medication_id: Default::default(),
        };

        let json = serde_json::to_value(&payload).unwrap();
        for field in &[
            "token",
            "scheduleTime",
            "medicationName",
            "dosage",
            "timeDisplay",
            "medicationId",
        ] {
            assert!(json.get(*field).is_some(), "missing field: {}", field);
        }
    }
}
