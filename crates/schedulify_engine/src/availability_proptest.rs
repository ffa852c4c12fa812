#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveTime, TimeZone, Timelike, Utc};
    use proptest::prelude::*;

    use schedulify_common::error::StoreError;
    use schedulify_common::models::{AppointmentId, Service, ServiceId};
    use schedulify_common::store::{OccupiedSlot, ScheduleReader};

    use crate::availability::{available_slots_at, has_conflict, intervals_overlap, SchedulePolicy};

    const SERVICE: ServiceId = 1;

    struct FakeSchedule {
        duration_minutes: i64,
        occupied: Vec<OccupiedSlot>,
    }

    impl ScheduleReader for FakeSchedule {
        fn service(&self, id: ServiceId) -> Result<Option<Service>, StoreError> {
            Ok((id == SERVICE).then(|| Service {
                id: SERVICE,
                name: "Session".to_string(),
                description: None,
                duration_minutes: self.duration_minutes,
                price_cents: 5000,
                is_active: true,
            }))
        }

        fn scheduled_in_window(
            &self,
            window_start: DateTime<Utc>,
            window_end: DateTime<Utc>,
            exclude: Option<AppointmentId>,
        ) -> Result<Vec<OccupiedSlot>, StoreError> {
            Ok(self
                .occupied
                .iter()
                .filter(|slot| {
                    exclude != Some(slot.appointment_id)
                        && slot.start_time < window_end
                        && slot.end_time() > window_start
                })
                .cloned()
                .collect())
        }
    }

    // Helper function to place an instant on the fixed test day
    fn on_test_day(minutes_past_midnight: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap() + chrono::Duration::minutes(minutes_past_midnight)
    }

    // Helper function to turn generated (offset, duration) pairs into occupied intervals
    fn build_occupied(raw: &[(i64, i64)]) -> Vec<OccupiedSlot> {
        raw.iter()
            .enumerate()
            .map(|(i, (offset, duration))| OccupiedSlot {
                appointment_id: i as AppointmentId + 1,
                start_time: on_test_day(*offset),
                duration_minutes: *duration,
            })
            .collect()
    }

    // Helper function to parse an "HH:MM" label into minutes past midnight
    fn label_minutes(label: &str) -> i64 {
        let time = NaiveTime::parse_from_str(label, "%H:%M").expect("labels are always HH:MM");
        i64::from(time.hour()) * 60 + i64::from(time.minute())
    }

    fn test_day() -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
    }

    // A clock on a different day, so "today" filtering never applies
    fn far_away_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    proptest! {
        // Test that offered slots never overlap an occupied interval
        #[test]
        fn test_offered_slots_never_overlap_busy_periods(
            duration_minutes in 15i64..=120,
            raw_busy in prop::collection::vec((0i64..1440, 15i64..180), 0..8),
        ) {
            let occupied = build_occupied(&raw_busy);
            let schedule = FakeSchedule { duration_minutes, occupied: occupied.clone() };
            let policy = SchedulePolicy::default();

            let slots = available_slots_at(&schedule, &policy, SERVICE, test_day(), far_away_now())
                .expect("slot query should succeed");

            for label in &slots {
                let slot_start = on_test_day(label_minutes(label));
                let slot_end = slot_start + chrono::Duration::minutes(duration_minutes);
                for busy in &occupied {
                    prop_assert!(
                        !intervals_overlap(slot_start, slot_end, busy.start_time, busy.end_time()),
                        "offered slot {} overlaps occupied interval {} .. {}",
                        label, busy.start_time, busy.end_time()
                    );
                }
            }
        }

        // Test that slots come out ordered, distinct and inside the work window
        #[test]
        fn test_slots_are_ordered_and_within_the_window(
            duration_minutes in 15i64..=120,
            raw_busy in prop::collection::vec((0i64..1440, 15i64..180), 0..8),
        ) {
            let schedule = FakeSchedule {
                duration_minutes,
                occupied: build_occupied(&raw_busy),
            };
            let policy = SchedulePolicy::default();

            let slots = available_slots_at(&schedule, &policy, SERVICE, test_day(), far_away_now())
                .expect("slot query should succeed");

            let window_start = 9 * 60;
            let window_end = 17 * 60;
            let mut previous = None;
            for label in &slots {
                let minutes = label_minutes(label);
                prop_assert!(
                    minutes >= window_start,
                    "slot {} starts before the work window", label
                );
                prop_assert!(
                    minutes + duration_minutes <= window_end,
                    "slot {} would end past the work window", label
                );
                if let Some(prev) = previous {
                    prop_assert!(minutes > prev, "slots must be strictly increasing");
                }
                previous = Some(minutes);
            }
        }

        // Test that the slot listing and the conflict check agree
        #[test]
        fn test_conflict_check_agrees_with_slot_listing(
            duration_minutes in 15i64..=120,
            raw_busy in prop::collection::vec((0i64..1440, 15i64..180), 0..8),
            candidate_index in 0i64..16,
        ) {
            let candidate_minutes = 9 * 60 + candidate_index * 30;
            // Only candidates that fit the window appear in the listing at all
            prop_assume!(candidate_minutes + duration_minutes <= 17 * 60);

            let schedule = FakeSchedule {
                duration_minutes,
                occupied: build_occupied(&raw_busy),
            };
            let policy = SchedulePolicy::default();

            let slots = available_slots_at(&schedule, &policy, SERVICE, test_day(), far_away_now())
                .expect("slot query should succeed");
            let conflict = has_conflict(&schedule, &policy, SERVICE, on_test_day(candidate_minutes), None)
                .expect("conflict check should succeed");

            let label = format!(
                "{:02}:{:02}",
                candidate_minutes / 60,
                candidate_minutes % 60
            );
            prop_assert_eq!(
                slots.contains(&label),
                !conflict,
                "slot {} should be offered exactly when it does not conflict",
                label
            );
        }
    }
}
