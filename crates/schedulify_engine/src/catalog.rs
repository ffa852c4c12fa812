// --- File: crates/schedulify_engine/src/catalog.rs ---
//! Service catalog management: field validation in front of the store's
//! uniqueness and referential rules.

use tracing::info;

use schedulify_common::error::StoreError;
use schedulify_common::models::{NewService, Service, ServiceId};
use schedulify_common::store::ScheduleStore;

use crate::availability::SchedulingError;

/// Creates an active service after validating its fields.
pub fn create_service(
    store: &dyn ScheduleStore,
    new: NewService,
) -> Result<Service, SchedulingError> {
    validate(&new.name, new.duration_minutes, new.price_cents)?;
    let service = store.insert_service(new).map_err(reject_duplicate)?;
    info!(
        "Catalog gained service '{}' ({} min, {} cents)",
        service.name, service.duration_minutes, service.price_cents
    );
    Ok(service)
}

/// Updates a service in place. Name uniqueness excludes the service itself,
/// so saving a service back under its own name always succeeds.
pub fn update_service(
    store: &dyn ScheduleStore,
    mut service: Service,
) -> Result<Service, SchedulingError> {
    service.name = service.name.trim().to_string();
    validate(&service.name, service.duration_minutes, service.price_cents)?;
    store.update_service(&service).map_err(reject_duplicate)?;
    Ok(service)
}

/// Retires or reinstates a service. A retired service takes no new bookings
/// but keeps its history and stays visible on billing reports.
pub fn set_service_active(
    store: &dyn ScheduleStore,
    id: ServiceId,
    active: bool,
) -> Result<Service, SchedulingError> {
    let service = store.set_service_active(id, active)?;
    info!(
        "Service '{}' is now {}",
        service.name,
        if service.is_active { "active" } else { "retired" }
    );
    Ok(service)
}

/// Services sorted by name. Retired services are included only on request.
pub fn list_services(
    store: &dyn ScheduleStore,
    include_inactive: bool,
) -> Result<Vec<Service>, SchedulingError> {
    Ok(store.services(include_inactive)?)
}

/// Hard delete. Refused while any non-cancelled appointment references the
/// service; retire it with [`set_service_active`] instead.
pub fn delete_service(store: &dyn ScheduleStore, id: ServiceId) -> Result<(), SchedulingError> {
    store.delete_service(id)?;
    info!("Service {} deleted", id);
    Ok(())
}

fn validate(name: &str, duration_minutes: i64, price_cents: i64) -> Result<(), SchedulingError> {
    if name.trim().is_empty() {
        return Err(SchedulingError::InvalidName);
    }
    if duration_minutes <= 0 {
        return Err(SchedulingError::InvalidDuration(duration_minutes));
    }
    if price_cents < 0 {
        return Err(SchedulingError::InvalidPrice(price_cents));
    }
    Ok(())
}

fn reject_duplicate(err: StoreError) -> SchedulingError {
    match err {
        StoreError::DuplicateServiceName(name) => SchedulingError::DuplicateName(name),
        other => SchedulingError::Store(other),
    }
}
