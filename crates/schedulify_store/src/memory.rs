// --- File: crates/schedulify_store/src/memory.rs ---
//! In-memory reference implementation of the persistence seam.
//!
//! State lives behind one `RwLock`. Guarded mutations hold the write lock
//! across the caller's conflict check and the commit, which closes the
//! check-then-insert gap for concurrent bookings; a SQL backend would
//! satisfy the same contract with a serializable transaction.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info};

use schedulify_common::error::StoreError;
use schedulify_common::models::{
    Appointment, AppointmentId, AppointmentStatus, CustomerId, NewAppointment, NewService,
    Service, ServiceId,
};
use schedulify_common::store::{BookingGuard, OccupiedSlot, ScheduleReader, ScheduleStore};

#[derive(Debug)]
struct StoreState {
    services: BTreeMap<ServiceId, Service>,
    appointments: BTreeMap<AppointmentId, Appointment>,
    next_service_id: ServiceId,
    next_appointment_id: AppointmentId,
}

impl StoreState {
    fn new() -> Self {
        StoreState {
            services: BTreeMap::new(),
            appointments: BTreeMap::new(),
            next_service_id: 1,
            next_appointment_id: 1,
        }
    }

    fn service(&self, id: ServiceId) -> Option<Service> {
        self.services.get(&id).cloned()
    }

    fn occupied_in_window(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        exclude: Option<AppointmentId>,
    ) -> Vec<OccupiedSlot> {
        self.appointments
            .values()
            .filter(|appt| appt.status == AppointmentStatus::Scheduled)
            .filter(|appt| Some(appt.id) != exclude)
            .filter_map(|appt| {
                let service = self.services.get(&appt.service_id)?;
                let end = appt.start_time + Duration::minutes(service.duration_minutes);
                // Half-open overlap with the window.
                (appt.start_time < window_end && end > window_start).then(|| OccupiedSlot {
                    appointment_id: appt.id,
                    start_time: appt.start_time,
                    duration_minutes: service.duration_minutes,
                })
            })
            .collect()
    }
}

/// Read-only view over locked state, handed to booking guards so the conflict
/// check runs against exactly what the mutation will commit into.
struct StateView<'a> {
    state: &'a StoreState,
}

impl ScheduleReader for StateView<'_> {
    fn service(&self, id: ServiceId) -> Result<Option<Service>, StoreError> {
        Ok(self.state.service(id))
    }

    fn scheduled_in_window(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        exclude: Option<AppointmentId>,
    ) -> Result<Vec<OccupiedSlot>, StoreError> {
        Ok(self.state.occupied_in_window(window_start, window_end, exclude))
    }
}

/// Thread-safe in-memory store. Cheap to create; the behavioral reference for
/// any other backend of the seam.
#[derive(Debug)]
pub struct InMemoryScheduleStore {
    inner: RwLock<StoreState>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        InMemoryScheduleStore {
            inner: RwLock::new(StoreState::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, StoreError> {
        self.inner.read().map_err(|e| {
            error!("Schedule store read lock poisoned: {}", e);
            StoreError::Lock(e.to_string())
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, StoreError> {
        self.inner.write().map_err(|e| {
            error!("Schedule store write lock poisoned: {}", e);
            StoreError::Lock(e.to_string())
        })
    }
}

impl Default for InMemoryScheduleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleReader for InMemoryScheduleStore {
    fn service(&self, id: ServiceId) -> Result<Option<Service>, StoreError> {
        Ok(self.read()?.service(id))
    }

    fn scheduled_in_window(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        exclude: Option<AppointmentId>,
    ) -> Result<Vec<OccupiedSlot>, StoreError> {
        let state = self.read()?;
        let slots = state.occupied_in_window(window_start, window_end, exclude);
        debug!(
            "Window query {} .. {} matched {} occupied slot(s)",
            window_start,
            window_end,
            slots.len()
        );
        Ok(slots)
    }
}

impl ScheduleStore for InMemoryScheduleStore {
    fn appointment(&self, id: AppointmentId) -> Result<Option<Appointment>, StoreError> {
        Ok(self.read()?.appointments.get(&id).cloned())
    }

    fn insert_appointment(
        &self,
        new: NewAppointment,
        guard: BookingGuard<'_>,
    ) -> Result<Appointment, StoreError> {
        let mut state = self.write()?;
        {
            let view = StateView { state: &*state };
            guard(&view)?;
        }
        let id = state.next_appointment_id;
        state.next_appointment_id += 1;
        let appointment = Appointment {
            id,
            customer_id: new.customer_id,
            service_id: new.service_id,
            start_time: new.start_time,
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
        };
        state.appointments.insert(id, appointment.clone());
        info!(
            "Booked appointment {} for customer {} at {}",
            id, appointment.customer_id, appointment.start_time
        );
        Ok(appointment)
    }

    fn reschedule_appointment(
        &self,
        id: AppointmentId,
        new_start: DateTime<Utc>,
        guard: BookingGuard<'_>,
    ) -> Result<Appointment, StoreError> {
        let mut state = self.write()?;
        if !state.appointments.contains_key(&id) {
            return Err(StoreError::AppointmentNotFound(id));
        }
        {
            let view = StateView { state: &*state };
            guard(&view)?;
        }
        let appointment = state
            .appointments
            .get_mut(&id)
            .ok_or(StoreError::AppointmentNotFound(id))?;
        appointment.start_time = new_start;
        appointment.status = AppointmentStatus::Rescheduled;
        let updated = appointment.clone();
        info!("Rescheduled appointment {} to {}", id, new_start);
        Ok(updated)
    }

    fn set_appointment_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
        new_start: Option<DateTime<Utc>>,
    ) -> Result<Appointment, StoreError> {
        let mut state = self.write()?;
        let appointment = state
            .appointments
            .get_mut(&id)
            .ok_or(StoreError::AppointmentNotFound(id))?;
        if let Some(start) = new_start {
            appointment.start_time = start;
        }
        appointment.status = status;
        let updated = appointment.clone();
        debug!("Appointment {} status set to {}", id, status);
        Ok(updated)
    }

    fn appointments_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Appointment>, StoreError> {
        let state = self.read()?;
        let mut found: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|appt| appt.customer_id == customer_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(found)
    }

    fn appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        let state = self.read()?;
        let mut all: Vec<Appointment> = state.appointments.values().cloned().collect();
        all.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(all)
    }

    fn completed_in_range(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<(Appointment, Service)>, StoreError> {
        let state = self.read()?;
        let rows = state
            .appointments
            .values()
            .filter(|appt| appt.status == AppointmentStatus::Completed)
            .filter(|appt| appt.start_time >= range_start && appt.start_time < range_end)
            .filter_map(|appt| {
                let service = state.services.get(&appt.service_id)?;
                Some((appt.clone(), service.clone()))
            })
            .collect();
        Ok(rows)
    }

    fn insert_service(&self, new: NewService) -> Result<Service, StoreError> {
        let mut state = self.write()?;
        let name = new.name.trim().to_string();
        if state.services.values().any(|svc| svc.name == name) {
            return Err(StoreError::DuplicateServiceName(name));
        }
        let id = state.next_service_id;
        state.next_service_id += 1;
        let service = Service {
            id,
            name,
            description: new.description,
            duration_minutes: new.duration_minutes,
            price_cents: new.price_cents,
            is_active: true,
        };
        state.services.insert(id, service.clone());
        info!("Created service {} ('{}')", id, service.name);
        Ok(service)
    }

    fn update_service(&self, service: &Service) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if !state.services.contains_key(&service.id) {
            return Err(StoreError::ServiceNotFound(service.id));
        }
        let name = service.name.trim().to_string();
        if state
            .services
            .values()
            .any(|other| other.id != service.id && other.name == name)
        {
            return Err(StoreError::DuplicateServiceName(name));
        }
        let mut updated = service.clone();
        updated.name = name;
        state.services.insert(service.id, updated);
        debug!("Updated service {}", service.id);
        Ok(())
    }

    fn set_service_active(&self, id: ServiceId, active: bool) -> Result<Service, StoreError> {
        let mut state = self.write()?;
        let service = state
            .services
            .get_mut(&id)
            .ok_or(StoreError::ServiceNotFound(id))?;
        service.is_active = active;
        let updated = service.clone();
        info!(
            "Service {} {}",
            id,
            if active { "activated" } else { "deactivated" }
        );
        Ok(updated)
    }

    fn services(&self, include_inactive: bool) -> Result<Vec<Service>, StoreError> {
        let state = self.read()?;
        let mut list: Vec<Service> = state
            .services
            .values()
            .filter(|svc| include_inactive || svc.is_active)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    fn delete_service(&self, id: ServiceId) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if !state.services.contains_key(&id) {
            return Err(StoreError::ServiceNotFound(id));
        }
        let referenced = state
            .appointments
            .values()
            .any(|appt| appt.service_id == id && appt.status != AppointmentStatus::Cancelled);
        if referenced {
            return Err(StoreError::ServiceInUse(id));
        }
        state.services.remove(&id);
        info!("Deleted service {}", id);
        Ok(())
    }
}
