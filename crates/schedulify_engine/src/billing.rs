// --- File: crates/schedulify_engine/src/billing.rs ---
//! Revenue reporting over completed appointments.
//!
//! Only `Completed` appointments bill; scheduled, cancelled and rescheduled
//! ones never appear here. Report ranges are inclusive local dates in the
//! business time zone.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use tracing::debug;

use schedulify_common::models::{AppointmentId, CustomerId};
use schedulify_common::store::ScheduleStore;

use crate::availability::{local_instant, SchedulePolicy, SchedulingError};

/// One completed appointment on the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingLine {
    pub appointment_id: AppointmentId,
    pub customer_id: CustomerId,
    pub service_name: String,
    pub price_cents: i64,
    pub completed_at: DateTime<Utc>,
}

/// Revenue summary for an inclusive date range, lines most recent first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingReport {
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    pub total_cents: i64,
    pub lines: Vec<BillingLine>,
}

/// Builds a report for the given inclusive date range, defaulting to the
/// current month in the business time zone when no range is passed.
pub fn billing_report(
    store: &dyn ScheduleStore,
    policy: &SchedulePolicy,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<BillingReport, SchedulingError> {
    billing_report_at(store, policy, range, Utc::now())
}

/// [`billing_report`] with an explicit clock. The clock only matters when
/// the range is defaulted.
pub fn billing_report_at(
    store: &dyn ScheduleStore,
    policy: &SchedulePolicy,
    range: Option<(NaiveDate, NaiveDate)>,
    now: DateTime<Utc>,
) -> Result<BillingReport, SchedulingError> {
    let (range_start, range_end) = match range {
        Some(pair) => pair,
        None => month_of(now.with_timezone(&policy.time_zone).date_naive()),
    };
    if range_start > range_end {
        return Err(SchedulingError::InvalidRange);
    }

    // Inclusive local dates become a half-open range of UTC instants.
    let start_instant = local_instant(policy.time_zone, range_start, NaiveTime::MIN);
    let end_instant = local_instant(
        policy.time_zone,
        range_end + Duration::days(1),
        NaiveTime::MIN,
    );

    let mut rows = store.completed_in_range(start_instant, end_instant)?;
    rows.sort_by(|a, b| b.0.start_time.cmp(&a.0.start_time));

    let total_cents: i64 = rows.iter().map(|(_, service)| service.price_cents).sum();
    let lines: Vec<BillingLine> = rows
        .into_iter()
        .map(|(appointment, service)| BillingLine {
            appointment_id: appointment.id,
            customer_id: appointment.customer_id,
            service_name: service.name,
            price_cents: service.price_cents,
            completed_at: appointment.start_time,
        })
        .collect();

    debug!(
        "Billing report {} ..= {}: {} line(s), {} cents",
        range_start,
        range_end,
        lines.len(),
        total_cents
    );
    Ok(BillingReport {
        range_start,
        range_end,
        total_cents,
        lines,
    })
}

/// First and last day of `date`'s month.
fn month_of(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let next_month_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month_first.and_then(|d| d.pred_opt()).unwrap_or(date);
    (first, last)
}
