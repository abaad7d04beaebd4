//! Recurrence expansion.
//!
//! Turns a seed event and its repeat rule into the full, ordered list of
//! dated occurrences.
//!
//! # Stepping
//!
//! Each occurrence is computed from the previous occurrence's date:
//!
//! - daily: `interval` days later
//! - weekly: `7 * interval` days later
//! - monthly: `interval` months later, on the seed's day-of-month clamped to
//!   the length of the target month
//! - yearly: `interval` years later, in the seed's month, on the seed's day
//!   (Feb 29 becomes Feb 28 in common years)
//!
//! Clamping always starts again from the seed's day, so a series seeded on
//! the 31st returns to the 31st after passing through a shorter month.
//!
//! # Bounds
//!
//! Expansion stops before the first date past the rule's end date, or past
//! [`HORIZON`] when the rule has none.

use chrono::{Datelike, Days, NaiveDate};
use thiserror::Error;

use crate::event::Event;
use crate::repeat::{RepeatRule, RepeatType};

/// The last date any open-ended series may produce.
pub const HORIZON: NaiveDate = match NaiveDate::from_ymd_opt(2025, 10, 30) {
    Some(date) => date,
    None => panic!("horizon must be a valid date"),
};

/// Precondition violations detected while expanding a series.
///
/// Drafts are validated before expansion, so hitting one of these points at
/// a caller that skipped validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    /// A recurring rule had an interval below one.
    #[error("repeat interval must be at least 1 for {kind} rules, got {interval}")]
    InvalidInterval { kind: RepeatType, interval: u32 },

    /// A step did not move the date forward.
    #[error("{kind} step from {from} did not advance the date")]
    Stalled { kind: RepeatType, from: NaiveDate },

    /// A step left the representable calendar.
    #[error("{kind} step from {from} is out of the supported date range")]
    OutOfRange { kind: RepeatType, from: NaiveDate },
}

/// The last date an expansion of `rule` may reach.
///
/// An explicit end date bounds the series on its own; open-ended series stop
/// at [`HORIZON`].
#[must_use]
pub fn effective_end(rule: &RepeatRule) -> NaiveDate {
    rule.end_date.unwrap_or(HORIZON)
}

/// Expands a seed event into its occurrences.
///
/// A `none` rule yields the seed unchanged. A recurring rule yields the seed
/// (marked recurring) followed by each derived occurrence, in date order. If
/// the end date falls before the seed's own date the seed is returned
/// unchanged.
pub fn expand(seed: &Event) -> Result<Vec<Event>, RecurrenceError> {
    let rule = &seed.repeat;
    if !rule.kind.is_recurring() {
        return Ok(vec![seed.clone()]);
    }
    if rule.interval == 0 {
        return Err(RecurrenceError::InvalidInterval {
            kind: rule.kind,
            interval: rule.interval,
        });
    }

    let end = effective_end(rule);
    if end < seed.date {
        tracing::debug!(seed = %seed.id, %end, "end date precedes seed; not expanding");
        return Ok(vec![seed.clone()]);
    }

    let mut occurrences = vec![Event {
        is_recurring: true,
        ..seed.clone()
    }];
    let mut current = seed.date;

    loop {
        let next = next_date(current, rule, seed.date)?;
        if next <= current {
            return Err(RecurrenceError::Stalled {
                kind: rule.kind,
                from: current,
            });
        }
        if next > end {
            break;
        }
        occurrences.push(seed.occurrence(occurrences.len(), next));
        current = next;
    }

    tracing::debug!(
        seed = %seed.id,
        kind = %rule.kind,
        interval = rule.interval,
        count = occurrences.len(),
        "expanded recurring event"
    );
    Ok(occurrences)
}

/// Computes the date following `current` under `rule`.
///
/// `anchor` is the seed date; monthly and yearly steps take their day (and
/// yearly steps their month) from it rather than from `current`.
fn next_date(
    current: NaiveDate,
    rule: &RepeatRule,
    anchor: NaiveDate,
) -> Result<NaiveDate, RecurrenceError> {
    let out_of_range = || RecurrenceError::OutOfRange {
        kind: rule.kind,
        from: current,
    };
    let interval = rule.interval;

    let next = match rule.kind {
        RepeatType::None => Some(current),
        RepeatType::Daily => current.checked_add_days(Days::new(u64::from(interval))),
        RepeatType::Weekly => current.checked_add_days(Days::new(7 * u64::from(interval))),
        RepeatType::Monthly => add_months(current, interval, anchor.day()),
        RepeatType::Yearly => add_years(current, interval, anchor.month(), anchor.day()),
    };
    next.ok_or_else(out_of_range)
}

/// Moves `months` months past `date`, landing on `day` clamped to the target month.
fn add_months(date: NaiveDate, months: u32, day: u32) -> Option<NaiveDate> {
    let total = i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    on_clamped_day(year, month, day)
}

/// Moves `years` years past `date`, landing on `month`/`day` clamped to the target month.
fn add_years(date: NaiveDate, years: u32, month: u32, day: u32) -> Option<NaiveDate> {
    let year = date.year().checked_add(i32::try_from(years).ok()?)?;
    on_clamped_day(year, month, day)
}

fn on_clamped_day(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = days_in_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.min(last))
}

/// Returns the number of days in a month.
fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }?;
    first_of_next.pred_opt().map(|last| last.day())
}
