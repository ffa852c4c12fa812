// --- File: crates/schedulify_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- Scheduling Config ---
// Every field carries a default so an absent config file still yields a
// working configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SchedulingConfig {
    /// IANA time zone in which day boundaries and slot labels are computed.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Start of the daily booking window, "HH:MM".
    #[serde(default = "default_work_start_time")]
    pub work_start_time: String,
    /// End of the daily booking window, "HH:MM".
    #[serde(default = "default_work_end_time")]
    pub work_end_time: String,
    /// Spacing between candidate slots, in minutes.
    #[serde(default = "default_slot_step_minutes")]
    pub slot_step_minutes: i64,
    /// How far into the past a booking request may still reach, in minutes.
    #[serde(default = "default_booking_grace_minutes")]
    pub booking_grace_minutes: i64,
    /// How long before the start time a reminder fires, in hours.
    #[serde(default = "default_reminder_lead_hours")]
    pub reminder_lead_hours: i64,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}
fn default_work_start_time() -> String {
    "09:00".to_string()
}
fn default_work_end_time() -> String {
    "17:00".to_string()
}
fn default_slot_step_minutes() -> i64 {
    30
}
fn default_booking_grace_minutes() -> i64 {
    5
}
fn default_reminder_lead_hours() -> i64 {
    24
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        SchedulingConfig {
            time_zone: default_time_zone(),
            work_start_time: default_work_start_time(),
            work_end_time: default_work_end_time(),
            slot_step_minutes: default_slot_step_minutes(),
            booking_grace_minutes: default_booking_grace_minutes(),
            reminder_lead_hours: default_reminder_lead_hours(),
        }
    }
}

// --- Application Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub scheduling: SchedulingConfig,
}
