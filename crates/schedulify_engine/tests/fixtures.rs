//! Test fixtures for scheduling flow tests
//!
//! This module provides common test fixtures and factory functions
//! to create catalogs, stores and schedulers for integration tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use schedulify_common::models::{NewAppointment, NewService, Service};
use schedulify_common::store::ScheduleStore;
use schedulify_engine::availability::SchedulePolicy;
use schedulify_engine::booking::Scheduler;
use schedulify_store::InMemoryScheduleStore;

/// Creates a store preloaded with the standard three-service catalog.
pub fn create_store_with_catalog() -> (Arc<InMemoryScheduleStore>, Vec<Service>) {
    let store = Arc::new(InMemoryScheduleStore::new());
    let services = vec![
        create_service(store.as_ref(), "Haircut", 60, 4500),
        create_service(store.as_ref(), "Trim", 30, 2000),
        create_service(store.as_ref(), "Massage", 90, 8000),
    ];
    (store, services)
}

/// Creates a single active service.
pub fn create_service(
    store: &InMemoryScheduleStore,
    name: &str,
    duration_minutes: i64,
    price_cents: i64,
) -> Service {
    store
        .insert_service(NewService {
            name: name.to_string(),
            description: Some(format!("{} ({} min)", name, duration_minutes)),
            duration_minutes,
            price_cents,
        })
        .expect("service insert should succeed")
}

/// Creates a scheduler over the given store with the default policy.
pub fn create_scheduler(store: &Arc<InMemoryScheduleStore>) -> Scheduler<InMemoryScheduleStore> {
    Scheduler::new(Arc::clone(store), SchedulePolicy::default())
}

/// A booking payload for the given customer, service and start.
pub fn create_booking(
    customer_id: i64,
    service: &Service,
    start_time: DateTime<Utc>,
) -> NewAppointment {
    NewAppointment {
        customer_id,
        service_id: service.id,
        start_time,
    }
}

/// An instant on the fixed test Monday (2025-05-05, UTC).
pub fn monday_at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 5, hour, min, 0).unwrap()
}

/// An instant on the following Tuesday.
#[allow(dead_code)]
pub fn tuesday_at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 6, hour, min, 0).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_store_with_catalog() {
        let (store, services) = create_store_with_catalog();

        assert_eq!(services.len(), 3);
        assert!(services.iter().all(|s| s.is_active));
        assert_eq!(services[0].name, "Haircut");
        assert_eq!(services[0].duration_minutes, 60);

        // The catalog is persisted, not just returned
        let listed = store.services(true).expect("listing should succeed");
        assert_eq!(listed.len(), 3);
    }

    #[test]
    fn test_create_booking() {
        let (_store, services) = create_store_with_catalog();
        let booking = create_booking(10, &services[0], monday_at(10, 0));

        assert_eq!(booking.customer_id, 10);
        assert_eq!(booking.service_id, services[0].id);
        assert_eq!(booking.start_time, monday_at(10, 0));
    }

    #[test]
    fn test_fixed_days_are_consecutive() {
        let gap = tuesday_at(10, 0) - monday_at(10, 0);
        assert_eq!(gap, chrono::Duration::days(1));
    }
}
