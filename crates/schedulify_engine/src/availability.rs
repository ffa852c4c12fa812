// --- File: crates/schedulify_engine/src/availability.rs ---
//! Conflict detection and slot enumeration.
//!
//! Both queries are pure reads over a [`ScheduleReader`]: they hold no state
//! of their own, perform no writes, and are safe to call from any thread.
//! Day boundaries and slot labels are computed in the business time zone
//! carried by [`SchedulePolicy`], while all interval arithmetic happens on
//! UTC instants.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::debug;

use schedulify_common::error::StoreError;
use schedulify_common::models::{AppointmentId, AppointmentStatus, ServiceId};
use schedulify_common::store::ScheduleReader;
use schedulify_config::SchedulingConfig;

// --- Error Handling ---

/// Errors surfaced by the scheduling engine.
#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("unknown service: {0}")]
    UnknownService(ServiceId),
    #[error("service {0} is not accepting bookings")]
    ServiceInactive(ServiceId),
    #[error("unknown appointment: {0}")]
    UnknownAppointment(AppointmentId),
    #[error("requested slot is already taken")]
    SlotTaken,
    #[error("start time is in the past")]
    StartInPast,
    #[error("appointment has already occurred")]
    AlreadyOccurred,
    #[error("appointment is {0} and cannot be moved")]
    AlreadyClosed(AppointmentStatus),
    #[error("a service named '{0}' already exists")]
    DuplicateName(String),
    #[error("service name must not be empty")]
    InvalidName,
    #[error("service duration must be positive, got {0}")]
    InvalidDuration(i64),
    #[error("service price must not be negative, got {0}")]
    InvalidPrice(i64),
    #[error("report range must start on or before its end")]
    InvalidRange,
    #[error("invalid scheduling config: {0}")]
    Config(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

// --- Policy ---

/// Validated runtime form of [`SchedulingConfig`].
///
/// Construction through [`SchedulePolicy::from_config`] guarantees the time
/// zone is a known IANA name, the work window is non-empty and the step is
/// positive, so the query functions never re-validate.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulePolicy {
    /// Zone in which day boundaries and slot labels are computed.
    pub time_zone: Tz,
    /// Start of the daily booking window (local wall time).
    pub work_start: NaiveTime,
    /// End of the daily booking window (local wall time, exclusive).
    pub work_end: NaiveTime,
    /// Spacing between candidate slot starts.
    pub slot_step: Duration,
    /// How far into the past a booking request may still reach.
    pub booking_grace: Duration,
    /// How long before the start a reminder fires.
    pub reminder_lead: Duration,
}

impl SchedulePolicy {
    /// Builds a policy from loaded configuration.
    pub fn from_config(cfg: &SchedulingConfig) -> Result<Self, SchedulingError> {
        let time_zone: Tz = cfg
            .time_zone
            .parse()
            .map_err(|_| SchedulingError::Config(format!("unknown time zone '{}'", cfg.time_zone)))?;
        let work_start = parse_wall_time(&cfg.work_start_time)?;
        let work_end = parse_wall_time(&cfg.work_end_time)?;
        if work_end <= work_start {
            return Err(SchedulingError::Config(format!(
                "work window must end after it starts ({} .. {})",
                cfg.work_start_time, cfg.work_end_time
            )));
        }
        if cfg.slot_step_minutes <= 0 {
            return Err(SchedulingError::Config(format!(
                "slot step must be positive, got {}",
                cfg.slot_step_minutes
            )));
        }
        if cfg.booking_grace_minutes < 0 || cfg.reminder_lead_hours < 0 {
            return Err(SchedulingError::Config(
                "booking grace and reminder lead must not be negative".to_string(),
            ));
        }
        Ok(SchedulePolicy {
            time_zone,
            work_start,
            work_end,
            slot_step: Duration::minutes(cfg.slot_step_minutes),
            booking_grace: Duration::minutes(cfg.booking_grace_minutes),
            reminder_lead: Duration::hours(cfg.reminder_lead_hours),
        })
    }
}

impl Default for SchedulePolicy {
    /// Matches the defaults of [`SchedulingConfig`]: a 09:00-17:00 UTC window
    /// with 30-minute slots, 5 minutes of booking grace and a 24 hour
    /// reminder lead.
    fn default() -> Self {
        SchedulePolicy {
            time_zone: chrono_tz::UTC,
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            slot_step: Duration::minutes(30),
            booking_grace: Duration::minutes(5),
            reminder_lead: Duration::hours(24),
        }
    }
}

fn parse_wall_time(value: &str) -> Result<NaiveTime, SchedulingError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| SchedulingError::Config(format!("invalid wall time '{}': {}", value, e)))
}

// --- Time helpers ---

/// Resolves a local wall-clock time on `date` to a UTC instant.
///
/// When a spring-forward gap swallows the requested wall time, the mapping
/// shifts one hour later (the width of a standard gap) so local midnight on
/// a transition day still yields a usable day boundary. Ambiguous wall times
/// during fall-back resolve to their first occurrence.
pub(crate) fn local_instant(tz: Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(first, _) => first.with_timezone(&Utc),
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            match tz.from_local_datetime(&shifted) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
                // No real zone has a gap this wide; fall back to reading the
                // wall time as UTC rather than failing the whole query.
                LocalResult::None => Utc.from_utc_datetime(&naive),
            }
        }
    }
}

/// The half-open UTC range covering `date` from local midnight to the next
/// local midnight in `tz`.
pub(crate) fn day_bounds(tz: Tz, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_instant(tz, date, NaiveTime::MIN);
    let end = local_instant(tz, date + Duration::days(1), NaiveTime::MIN);
    (start, end)
}

/// Two half-open intervals `[a_start, a_end)` and `[b_start, b_end)` overlap
/// iff each starts before the other ends. Touching endpoints (one interval
/// ending exactly where the other begins) do not overlap.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

// --- Queries ---

/// Would a booking of `service_id` starting at `desired_start` overlap any
/// scheduled appointment on the same local day?
///
/// The candidate interval runs for the service's own duration; each occupied
/// interval runs for the duration of the service it was booked against. An
/// unknown service reports no conflict, so callers that need the id to exist
/// must validate it separately before treating the answer as permission to
/// book. `exclude` removes one appointment from consideration so a
/// reschedule does not collide with itself.
pub fn has_conflict(
    reader: &dyn ScheduleReader,
    policy: &SchedulePolicy,
    service_id: ServiceId,
    desired_start: DateTime<Utc>,
    exclude: Option<AppointmentId>,
) -> Result<bool, StoreError> {
    let Some(service) = reader.service(service_id)? else {
        debug!(
            "Conflict check for unknown service {}, reporting no conflict",
            service_id
        );
        return Ok(false);
    };

    let desired_end = desired_start + Duration::minutes(service.duration_minutes);
    let local_date = desired_start.with_timezone(&policy.time_zone).date_naive();
    let (day_start, day_end) = day_bounds(policy.time_zone, local_date);

    let occupied = reader.scheduled_in_window(day_start, day_end, exclude)?;
    for busy in &occupied {
        if intervals_overlap(desired_start, desired_end, busy.start_time, busy.end_time()) {
            debug!(
                "Candidate {} .. {} conflicts with appointment {} ({} .. {})",
                desired_start,
                desired_end,
                busy.appointment_id,
                busy.start_time,
                busy.end_time()
            );
            return Ok(true);
        }
    }
    Ok(false)
}

/// Bookable start times for `service_id` on `date`, as ordered "HH:MM"
/// labels in the business time zone.
///
/// Evaluates against the current wall clock; tests and replay tooling use
/// [`available_slots_at`] to pin "now".
pub fn available_slots(
    reader: &dyn ScheduleReader,
    policy: &SchedulePolicy,
    service_id: ServiceId,
    date: NaiveDate,
) -> Result<Vec<String>, StoreError> {
    available_slots_at(reader, policy, service_id, date, Utc::now())
}

/// [`available_slots`] with an explicit "now".
///
/// Candidates run from the window start in `slot_step` increments. A
/// candidate is dropped when it has already begun (only when `date` is the
/// current day in the business zone) or when it overlaps an occupied
/// interval; enumeration stops at the first candidate whose end would spill
/// past the window end, since later ones only end later. An unknown service
/// yields no slots.
pub fn available_slots_at(
    reader: &dyn ScheduleReader,
    policy: &SchedulePolicy,
    service_id: ServiceId,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Vec<String>, StoreError> {
    let Some(service) = reader.service(service_id)? else {
        debug!("Slot query for unknown service {}, returning none", service_id);
        return Ok(Vec::new());
    };

    let duration = Duration::minutes(service.duration_minutes);
    let window_start = local_instant(policy.time_zone, date, policy.work_start);
    let window_end = local_instant(policy.time_zone, date, policy.work_end);
    let occupied = reader.scheduled_in_window(window_start, window_end, None)?;
    debug!(
        "Evaluating slots on {} for service {} against {} occupied interval(s)",
        date,
        service_id,
        occupied.len()
    );

    let today = now.with_timezone(&policy.time_zone).date_naive() == date;

    let mut slots = Vec::new();
    let mut wall_time = policy.work_start;
    while wall_time < policy.work_end {
        let slot_start = local_instant(policy.time_zone, date, wall_time);
        let slot_end = slot_start + duration;
        if slot_end > window_end {
            break;
        }

        let already_begun = today && slot_start < now;
        if !already_begun {
            let blocked = occupied.iter().any(|busy| {
                intervals_overlap(slot_start, slot_end, busy.start_time, busy.end_time())
            });
            if !blocked {
                slots.push(wall_time.format("%H:%M").to_string());
            }
        }

        let (next, wrapped) = wall_time.overflowing_add_signed(policy.slot_step);
        if wrapped != 0 {
            // Stepping crossed midnight; the window is over.
            break;
        }
        wall_time = next;
    }

    Ok(slots)
}
