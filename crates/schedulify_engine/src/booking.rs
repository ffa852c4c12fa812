// --- File: crates/schedulify_engine/src/booking.rs ---
//! Booking flows over the availability engine.
//!
//! [`Scheduler`] owns a store handle and a [`SchedulePolicy`] and runs the
//! write paths: book, cancel, reschedule and administrative status updates.
//! The conflict check and the mutation it protects execute as one guarded
//! store step, so two concurrent requests for the same slot cannot both
//! commit.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use schedulify_common::error::StoreError;
use schedulify_common::models::{
    Appointment, AppointmentId, AppointmentStatus, CustomerId, NewAppointment, ServiceId,
};
use schedulify_common::store::{ScheduleReader, ScheduleStore};

use crate::availability::{self, SchedulePolicy, SchedulingError};

/// Outcome of an administrative status update.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub appointment: Appointment,
    /// True when completing ahead of schedule rewrote the start to "now" so
    /// the revenue lands on the completion date.
    pub start_adjusted: bool,
}

/// Booking front door: field validation, conflict guarding and status
/// transitions. Clock-dependent methods take their time from `Utc::now` and
/// each has an `_at` sibling with an explicit clock for tests.
pub struct Scheduler<S: ScheduleStore> {
    store: Arc<S>,
    policy: SchedulePolicy,
}

impl<S: ScheduleStore> Scheduler<S> {
    pub fn new(store: Arc<S>, policy: SchedulePolicy) -> Self {
        Scheduler { store, policy }
    }

    pub fn policy(&self) -> &SchedulePolicy {
        &self.policy
    }

    /// Bookable "HH:MM" start times for the service on the given day.
    pub fn available_slots(
        &self,
        service_id: ServiceId,
        date: NaiveDate,
    ) -> Result<Vec<String>, SchedulingError> {
        Ok(availability::available_slots(
            self.store.as_ref(),
            &self.policy,
            service_id,
            date,
        )?)
    }

    /// Whether booking `service_id` at `start_time` would collide with an
    /// existing appointment.
    pub fn has_conflict(
        &self,
        service_id: ServiceId,
        start_time: DateTime<Utc>,
        exclude: Option<AppointmentId>,
    ) -> Result<bool, SchedulingError> {
        Ok(availability::has_conflict(
            self.store.as_ref(),
            &self.policy,
            service_id,
            start_time,
            exclude,
        )?)
    }

    /// Books an appointment, refusing unknown or retired services, starts
    /// further in the past than the booking grace, and occupied slots.
    pub fn book(&self, new: NewAppointment) -> Result<Appointment, SchedulingError> {
        self.book_at(new, Utc::now())
    }

    /// [`Scheduler::book`] with an explicit clock.
    pub fn book_at(
        &self,
        new: NewAppointment,
        now: DateTime<Utc>,
    ) -> Result<Appointment, SchedulingError> {
        let service = self
            .store
            .service(new.service_id)?
            .ok_or(SchedulingError::UnknownService(new.service_id))?;
        if !service.is_active {
            return Err(SchedulingError::ServiceInactive(service.id));
        }
        // The grace keeps "right now" bookings from losing a race against
        // the clock while the request is in flight.
        if new.start_time < now - self.policy.booking_grace {
            return Err(SchedulingError::StartInPast);
        }

        let policy = &self.policy;
        let service_id = new.service_id;
        let start_time = new.start_time;
        let guard = move |view: &dyn ScheduleReader| -> Result<(), StoreError> {
            if availability::has_conflict(view, policy, service_id, start_time, None)? {
                Err(StoreError::Conflict)
            } else {
                Ok(())
            }
        };

        let appointment = self
            .store
            .insert_appointment(new, &guard)
            .map_err(reject_conflict)?;
        info!(
            "Customer {} booked service {} at {} (appointment {})",
            appointment.customer_id, appointment.service_id, appointment.start_time, appointment.id
        );
        Ok(appointment)
    }

    /// Cancels an upcoming appointment. Appointments whose start has passed
    /// can no longer be cancelled.
    pub fn cancel(&self, id: AppointmentId) -> Result<Appointment, SchedulingError> {
        self.cancel_at(id, Utc::now())
    }

    /// [`Scheduler::cancel`] with an explicit clock.
    pub fn cancel_at(
        &self,
        id: AppointmentId,
        now: DateTime<Utc>,
    ) -> Result<Appointment, SchedulingError> {
        let appointment = self.lookup(id)?;
        if appointment.start_time < now {
            return Err(SchedulingError::AlreadyOccurred);
        }
        let cancelled = self
            .store
            .set_appointment_status(id, AppointmentStatus::Cancelled, None)?;
        info!("Appointment {} cancelled", id);
        Ok(cancelled)
    }

    /// Moves an appointment to a new start, keeping its service and
    /// customer. The old slot is released and the new one claimed in the
    /// same guarded step, so moving within a fully booked day works as long
    /// as the new interval only overlaps the appointment being moved.
    pub fn reschedule(
        &self,
        id: AppointmentId,
        new_start: DateTime<Utc>,
    ) -> Result<Appointment, SchedulingError> {
        self.reschedule_at(id, new_start, Utc::now())
    }

    /// [`Scheduler::reschedule`] with an explicit clock.
    pub fn reschedule_at(
        &self,
        id: AppointmentId,
        new_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Appointment, SchedulingError> {
        let appointment = self.lookup(id)?;
        if appointment.status.is_terminal() {
            return Err(SchedulingError::AlreadyClosed(appointment.status));
        }
        // Unlike booking there is no grace here; a moved appointment must
        // land strictly in the future.
        if new_start < now {
            return Err(SchedulingError::StartInPast);
        }

        let policy = &self.policy;
        let service_id = appointment.service_id;
        let guard = move |view: &dyn ScheduleReader| -> Result<(), StoreError> {
            if availability::has_conflict(view, policy, service_id, new_start, Some(id))? {
                Err(StoreError::Conflict)
            } else {
                Ok(())
            }
        };

        let moved = self
            .store
            .reschedule_appointment(id, new_start, &guard)
            .map_err(reject_conflict)?;
        info!("Appointment {} moved to {}", id, new_start);
        Ok(moved)
    }

    /// Administrative override: sets any status directly, without the
    /// transition rules of [`Scheduler::cancel`] and
    /// [`Scheduler::reschedule`]. Setting the current status again is a
    /// no-op. Completing an appointment that has not started yet pulls its
    /// start to "now" so the revenue lands on the completion date.
    pub fn update_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<StatusChange, SchedulingError> {
        self.update_status_at(id, status, Utc::now())
    }

    /// [`Scheduler::update_status`] with an explicit clock.
    pub fn update_status_at(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
        now: DateTime<Utc>,
    ) -> Result<StatusChange, SchedulingError> {
        let appointment = self.lookup(id)?;
        if appointment.status == status {
            debug!("Appointment {} already {}", id, status);
            return Ok(StatusChange {
                appointment,
                start_adjusted: false,
            });
        }

        let pull_forward = status == AppointmentStatus::Completed && appointment.start_time > now;
        let updated =
            self.store
                .set_appointment_status(id, status, pull_forward.then_some(now))?;
        if pull_forward {
            info!(
                "Appointment {} completed early; start moved from {} to {}",
                id, appointment.start_time, now
            );
        } else {
            info!("Appointment {} status changed to {}", id, status);
        }
        Ok(StatusChange {
            appointment: updated,
            start_adjusted: pull_forward,
        })
    }

    /// A customer's appointment history, most recent first.
    pub fn customer_appointments(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        Ok(self.store.appointments_for_customer(customer_id)?)
    }

    fn lookup(&self, id: AppointmentId) -> Result<Appointment, SchedulingError> {
        self.store
            .appointment(id)?
            .ok_or(SchedulingError::UnknownAppointment(id))
    }
}

/// A guard rejection means the slot was taken; anything else is a store
/// failure.
fn reject_conflict(err: StoreError) -> SchedulingError {
    match err {
        StoreError::Conflict => {
            warn!("Requested slot was taken during the guarded check");
            SchedulingError::SlotTaken
        }
        other => SchedulingError::Store(other),
    }
}
