mod device;
mod reminder;
mod schedule;
mod shared;

pub use device::DeviceRegistration;
pub use reminder::{DeliveryState, Reminder, ReminderAction};
pub use schedule::{compute_next_fire_time, ReminderSchedule, SchedulePreset};
pub use shared::entity::{Entity, ID};

pub use chrono_tz::Tz;
