// --- File: crates/schedulify_engine/src/reminders.rs ---
//! Reminder timing. Delivery (queues, mail, SMS) lives outside this crate;
//! these helpers only answer "when" and "still worth sending".

use chrono::{DateTime, Duration, Utc};

use schedulify_common::models::{Appointment, AppointmentStatus};

/// The instant a reminder for this appointment fires: `lead` before the
/// start.
pub fn reminder_time(appointment: &Appointment, lead: Duration) -> DateTime<Utc> {
    appointment.start_time - lead
}

/// Whether a reminder is still worth delivering. Checked again at delivery
/// time because the appointment may have been cancelled since the reminder
/// was scheduled.
pub fn should_send(appointment: &Appointment) -> bool {
    appointment.status != AppointmentStatus::Cancelled
}

/// Fire time for a newly booked or moved appointment, or `None` when the
/// appointment is cancelled or the fire time already lies behind `now` (a
/// same-day booking inside the lead window simply gets no reminder).
pub fn next_reminder(
    appointment: &Appointment,
    lead: Duration,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if !should_send(appointment) {
        return None;
    }
    let fire_at = reminder_time(appointment, lead);
    (fire_at > now).then_some(fire_at)
}
