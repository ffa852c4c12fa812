// --- File: crates/schedulify_common/src/error.rs ---
//! Error types for the persistence seam.

use thiserror::Error;

use crate::models::{AppointmentId, ServiceId};

/// Errors surfaced by `ScheduleReader`/`ScheduleStore` implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Lookup target does not exist
    #[error("service not found: {0}")]
    ServiceNotFound(ServiceId),

    /// Lookup target does not exist
    #[error("appointment not found: {0}")]
    AppointmentNotFound(AppointmentId),

    /// Service names are unique across the catalog
    #[error("a service named '{0}' already exists")]
    DuplicateServiceName(String),

    /// Hard delete refused while appointments still reference the service
    #[error("service {0} still has appointments attached")]
    ServiceInUse(ServiceId),

    /// A booking guard rejected the mutation
    #[error("booking conflict")]
    Conflict,

    /// Interior lock poisoned by a panicking writer
    #[error("store lock poisoned: {0}")]
    Lock(String),
}
