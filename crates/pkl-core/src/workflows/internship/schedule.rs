use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationStatus, PlacementPhase};

pub const MIN_DURATION_MONTHS: u8 = 1;
pub const MAX_DURATION_MONTHS: u8 = 12;

/// Agreed start and end dates of an approved placement, inclusive on both
/// ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("placement duration must be between {MIN_DURATION_MONTHS} and {MAX_DURATION_MONTHS} months, got {0}")]
    DurationOutOfRange(u8),
    #[error("placement end date is out of the representable calendar range")]
    EndOutOfRange,
}

/// Monday of the week containing `decided_on + lead_days`.
///
/// Placements begin at the start of a week so supervisors onboard cohorts
/// together; the lead gives the applicant notice before the first day.
pub fn placement_start(decided_on: NaiveDate, lead_days: i64) -> NaiveDate {
    let target = decided_on + Duration::days(lead_days);
    target - Duration::days(i64::from(target.weekday().num_days_from_monday()))
}

/// `start` advanced by the position duration. Day-of-month clamps the way
/// calendar month addition does (Jan 31 + 1 month is the end of February).
pub fn placement_end(start: NaiveDate, duration_months: u8) -> Result<NaiveDate, ScheduleError> {
    if !(MIN_DURATION_MONTHS..=MAX_DURATION_MONTHS).contains(&duration_months) {
        return Err(ScheduleError::DurationOutOfRange(duration_months));
    }

    start
        .checked_add_months(Months::new(u32::from(duration_months)))
        .ok_or(ScheduleError::EndOutOfRange)
}

/// Full period for an approval decided on `decided_on`.
pub fn placement_period(
    decided_on: NaiveDate,
    lead_days: i64,
    duration_months: u8,
) -> Result<PlacementPeriod, ScheduleError> {
    let start = placement_start(decided_on, lead_days);
    let end = placement_end(start, duration_months)?;
    Ok(PlacementPeriod { start, end })
}

/// Display status decision table.
///
/// Pure function of its arguments; callers pass the observation date, so the
/// same stored record renders differently as time passes without any write.
pub fn placement_phase(
    status: ApplicationStatus,
    period: Option<PlacementPeriod>,
    has_assessment: bool,
    today: NaiveDate,
) -> PlacementPhase {
    match status {
        ApplicationStatus::Pending => PlacementPhase::AwaitingDecision,
        ApplicationStatus::Rejected => PlacementPhase::Rejected,
        ApplicationStatus::Approved => match period {
            None => PlacementPhase::PeriodUnset,
            Some(period) if today < period.start => PlacementPhase::NotStarted,
            Some(period) if today <= period.end => PlacementPhase::InProgress,
            Some(_) if has_assessment => PlacementPhase::Completed,
            Some(_) => PlacementPhase::AwaitingAssessment,
        },
    }
}
