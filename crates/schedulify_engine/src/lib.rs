// --- File: crates/schedulify_engine/src/lib.rs ---
// Declare modules within this crate
pub mod availability; // Conflict detection and slot enumeration
#[cfg(test)]
mod availability_proptest;
pub mod billing; // Revenue reporting over completed appointments
pub mod booking; // Booking, cancellation and reschedule flows
pub mod catalog; // Service catalog management
pub mod reminders; // Reminder timing helpers

// Re-export the types most callers need so they can depend on this crate
// without spelling out module paths.
pub use availability::{
    available_slots, available_slots_at, has_conflict, intervals_overlap, SchedulePolicy,
    SchedulingError,
};
pub use billing::{billing_report, billing_report_at, BillingLine, BillingReport};
pub use booking::{Scheduler, StatusChange};
