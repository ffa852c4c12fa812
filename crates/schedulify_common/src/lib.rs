// --- File: crates/schedulify_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod logging; // Logging utilities
pub mod models; // Domain data structures
pub mod store; // Persistence seam abstractions

// Re-export the most used types for easier access
pub use error::StoreError;
pub use models::{
    Appointment, AppointmentId, AppointmentStatus, CustomerId, NewAppointment, NewService,
    Service, ServiceId,
};
pub use store::{BookingGuard, OccupiedSlot, ScheduleReader, ScheduleStore};
