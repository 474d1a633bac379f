use chrono_tz::Tz;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Seconds between two reconciliation passes of the background job.
    /// Failed deliveries are retried at this cadence, there is no separate
    /// backoff schedule.
    pub reconciliation_interval_secs: u64,
    /// How far into the future a postponed reminder is re-armed.
    pub postpone_minutes: i64,
    /// Timezone that wall-clock fire times are computed in.
    pub timezone: Tz,
    /// Endpoint of the external push provider accepting scheduled sends.
    /// When absent the push channel is unavailable and registered tokens
    /// cannot be used.
    pub push_api_url: Option<String>,
    /// Server key sent as a bearer token to the push provider.
    pub push_api_key: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let reconciliation_interval_secs = parse_env_number("RECONCILIATION_INTERVAL_SECS", 60);
        let postpone_minutes = parse_env_number("POSTPONE_MINUTES", 10);

        let timezone = match std::env::var("TIMEZONE") {
            Ok(name) => match name.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given TIMEZONE: {} is not a valid timezone name, falling back to UTC.",
                        name
                    );
                    chrono_tz::UTC
                }
            },
            Err(_) => chrono_tz::UTC,
        };

        let push_api_url = std::env::var("PUSH_API_URL").ok();
        if push_api_url.is_none() {
            info!("Did not find PUSH_API_URL environment variable. Push delivery is disabled and reminders will be delivered locally.");
        }
        let push_api_key = std::env::var("PUSH_API_KEY").ok();

        Self {
            port,
            reconciliation_interval_secs,
            postpone_minutes,
            timezone,
            push_api_url,
            push_api_key,
        }
    }
}

fn parse_env_number<T: std::str::FromStr + std::fmt::Display + Copy>(var: &str, default: T) -> T {
    match std::env::var(var) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    var, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
