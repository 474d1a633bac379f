use chrono::prelude::*;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Named time-of-day slots a user can pick instead of an explicit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulePreset {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl SchedulePreset {
    pub fn time_of_day(&self) -> (u32, u32) {
        match self {
            Self::Morning => (8, 0),
            Self::Afternoon => (13, 0),
            Self::Evening => (18, 0),
            Self::Night => (22, 0),
        }
    }
}

/// When a `Reminder` should fire, as wall-clock time of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ReminderSchedule {
    Preset(SchedulePreset),
    Explicit { hours: u32, minutes: u32 },
}

impl ReminderSchedule {
    pub fn time_of_day(&self) -> (u32, u32) {
        match self {
            Self::Preset(preset) => preset.time_of_day(),
            Self::Explicit { hours, minutes } => (*hours, *minutes),
        }
    }

    pub fn is_valid(&self) -> bool {
        let (hours, minutes) = self.time_of_day();
        hours < 24 && minutes < 60
    }

    /// The "HH:MM" form shown in notification payloads.
    pub fn time_display(&self) -> String {
        let (hours, minutes) = self.time_of_day();
        format!("{:02}:{:02}", hours, minutes)
    }
}

/// Next occurrence of `schedule` strictly after `now_millis`, in `tz`.
///
/// A target that is exactly equal to `now_millis` counts as already passed
/// and rolls over to tomorrow, so a delivery at the boundary can never
/// produce the same fire time again.
pub fn compute_next_fire_time(schedule: &ReminderSchedule, now_millis: i64, tz: &Tz) -> i64 {
    let (hours, minutes) = schedule.time_of_day();
    let now = tz.timestamp_millis(now_millis);

    let today = now.date().and_hms(hours, minutes, 0);
    if today.timestamp_millis() > now_millis {
        today.timestamp_millis()
    } else {
        now.date().succ().and_hms(hours, minutes, 0).timestamp_millis()
    }
}
