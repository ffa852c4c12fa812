// --- File: crates/schedulify_common/src/models.rs ---

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier aliases used across the store seam. The reference store assigns
/// them monotonically; a SQL backend would map them to autoincrement keys.
pub type ServiceId = i64;
pub type AppointmentId = i64;
pub type CustomerId = i64;

// --- Service catalog ---

/// A bookable service with a fixed duration and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    /// Unique across the catalog (compared on the trimmed name).
    pub name: String,
    pub description: Option<String>,
    /// Duration in minutes; always positive.
    pub duration_minutes: i64,
    /// Price in the smallest currency unit (e.g., cents).
    pub price_cents: i64,
    /// Inactive services stay visible in history and reports but accept no
    /// new bookings.
    pub is_active: bool,
}

/// Payload for creating a service; the store assigns the id and activates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i64,
    pub price_cents: i64,
}

// --- Appointments ---

/// Lifecycle states of an appointment. Only `Scheduled` occupies a slot for
/// conflict purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
}

impl AppointmentStatus {
    /// Canonical lowercase form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Rescheduled => "rescheduled",
        }
    }

    /// Parses the canonical lowercase form produced by `as_str`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            "rescheduled" => Some(AppointmentStatus::Rescheduled),
            _ => None,
        }
    }

    /// Completed and Cancelled appointments cannot be moved to a new slot.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booked appointment. `start_time` is stored in UTC; day-boundary and
/// display conversions happen in the engine with the configured zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub customer_id: CustomerId,
    pub service_id: ServiceId,
    pub start_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

/// Payload for booking; the store assigns id, status, and created_at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub customer_id: CustomerId,
    pub service_id: ServiceId,
    pub start_time: DateTime<Utc>,
}
