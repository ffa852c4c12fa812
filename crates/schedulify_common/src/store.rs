// --- File: crates/schedulify_common/src/store.rs ---
//! Persistence seam for the scheduling engine.
//!
//! The availability engine consumes appointments through [`ScheduleReader`],
//! a read-only view narrow enough to implement over any backend.
//! [`ScheduleStore`] is the full repository surface used by the booking,
//! catalog, and billing layers.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::StoreError;
use crate::models::{
    Appointment, AppointmentId, AppointmentStatus, CustomerId, NewAppointment, NewService,
    Service, ServiceId,
};

/// One `Scheduled` appointment as seen by the conflict check: its start and
/// the duration of its own service, joined by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupiedSlot {
    pub appointment_id: AppointmentId,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl OccupiedSlot {
    /// Exclusive end of the occupied interval.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(self.duration_minutes)
    }
}

/// Read-only queries the availability engine runs.
///
/// Implementations apply half-open overlap semantics to the window query: an
/// appointment occupying [s, e) is returned iff s < window_end AND
/// e > window_start.
pub trait ScheduleReader: Send + Sync {
    /// Looks up a service by id. `Ok(None)` when the id is unknown.
    fn service(&self, id: ServiceId) -> Result<Option<Service>, StoreError>;

    /// All `Scheduled` appointments whose occupied interval overlaps
    /// `[window_start, window_end)`, excluding `exclude` when given.
    fn scheduled_in_window(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        exclude: Option<AppointmentId>,
    ) -> Result<Vec<OccupiedSlot>, StoreError>;
}

/// Conflict check run inside a store's guarded mutation. The reader views the
/// exact state the mutation will commit into; returning an error aborts the
/// mutation.
pub type BookingGuard<'a> =
    &'a (dyn Fn(&dyn ScheduleReader) -> Result<(), StoreError> + Send + Sync);

/// Full repository surface over services and appointments.
pub trait ScheduleStore: ScheduleReader {
    // --- Appointments ---

    /// Looks up an appointment by id.
    fn appointment(&self, id: AppointmentId) -> Result<Option<Appointment>, StoreError>;

    /// Inserts a `Scheduled` appointment after running `guard` against the
    /// state the insert commits into. Guard and insert execute as one atomic
    /// step with respect to other guarded mutations.
    fn insert_appointment(
        &self,
        new: NewAppointment,
        guard: BookingGuard<'_>,
    ) -> Result<Appointment, StoreError>;

    /// Moves an appointment to `new_start` and marks it `Rescheduled`, with
    /// the same guard semantics as `insert_appointment`.
    fn reschedule_appointment(
        &self,
        id: AppointmentId,
        new_start: DateTime<Utc>,
        guard: BookingGuard<'_>,
    ) -> Result<Appointment, StoreError>;

    /// Sets an appointment's status, optionally rewriting its start time in
    /// the same step (used when an appointment is completed ahead of its
    /// booked time).
    fn set_appointment_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
        new_start: Option<DateTime<Utc>>,
    ) -> Result<Appointment, StoreError>;

    /// All appointments of one customer, most recent start first.
    fn appointments_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Appointment>, StoreError>;

    /// Every appointment in the store, most recent start first.
    fn appointments(&self) -> Result<Vec<Appointment>, StoreError>;

    /// Completed appointments with start in `[range_start, range_end)`,
    /// joined with their service. Unordered; callers sort.
    fn completed_in_range(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<(Appointment, Service)>, StoreError>;

    // --- Service catalog ---

    /// Inserts an active service. Fails with `DuplicateServiceName` when the
    /// trimmed name is already taken.
    fn insert_service(&self, new: NewService) -> Result<Service, StoreError>;

    /// Replaces a service's fields. Name uniqueness excludes the service
    /// itself.
    fn update_service(&self, service: &Service) -> Result<(), StoreError>;

    /// Flips the soft-delete flag.
    fn set_service_active(&self, id: ServiceId, active: bool) -> Result<Service, StoreError>;

    /// Services sorted by name; inactive ones only when requested.
    fn services(&self, include_inactive: bool) -> Result<Vec<Service>, StoreError>;

    /// Hard delete. Refused with `ServiceInUse` while any non-cancelled
    /// appointment references the service.
    fn delete_service(&self, id: ServiceId) -> Result<(), StoreError>;
}
