//! Shared utilities for CLI commands.

use std::io::Write;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use chrono::{Days, NaiveDate, NaiveDateTime};
use kal_core::notification::NOTIFICATION_OPTIONS;
use kal_core::{Event, EventDraft, EventId, RepeatRule};
use regex::Regex;
use uuid::Uuid;

use crate::Config;
use crate::cli::DraftArgs;

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^in\s+(\d+)\s+(day|week)s?$").unwrap());

/// Conservative bound for relative dates (~100 years in days).
const MAX_RELATIVE_DAYS: u64 = 100 * 366;

/// Parse a date string as either ISO 8601 or a date relative to `today`.
///
/// Supports:
/// - ISO 8601: "2025-10-15"
/// - Relative: "today", "tomorrow", "in 3 days", "in 2 weeks"
pub fn parse_date(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let lower = s.to_lowercase();
    match lower.as_str() {
        "today" => return Ok(today),
        "tomorrow" => return today.succ_opt().context("date out of range"),
        _ => {}
    }

    let Some(caps) = RELATIVE_DATE_RE.captures(&lower) else {
        bail!(
            "Invalid date: {s}. Use YYYY-MM-DD (e.g., 2025-10-15) or relative (e.g., 'tomorrow', 'in 2 weeks')"
        );
    };

    let n: u64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;
    let days_per_unit = match &caps[2] {
        "day" => 1,
        "week" => 7,
        unit => bail!("Unknown date unit: {unit}"),
    };

    let days = n.saturating_mul(days_per_unit);
    if days > MAX_RELATIVE_DAYS {
        bail!("Relative date too far away: {s}");
    }

    today
        .checked_add_days(Days::new(days))
        .context("date out of range")
}

/// Parse a local wall-clock moment written `YYYY-MM-DDTHH:MM`.
pub fn parse_moment(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M")
        .with_context(|| format!("Invalid moment: {s}. Use YYYY-MM-DDTHH:MM (e.g., 2025-10-15T09:50)"))
}

/// Checks a reminder lead time against the offered options.
pub fn check_notification_minutes(minutes: u32) -> Result<u32> {
    if !NOTIFICATION_OPTIONS.contains(&minutes) {
        bail!(
            "Invalid reminder lead time: {minutes} minutes. Choose one of {}",
            NOTIFICATION_OPTIONS.map(|m| m.to_string()).join(", ")
        );
    }
    Ok(minutes)
}

/// Generates an ID for a newly created event.
pub fn new_event_id() -> EventId {
    EventId::new(Uuid::new_v4().to_string()).unwrap_or_else(|_| unreachable!("UUIDs are never empty"))
}

impl DraftArgs {
    /// Builds an event draft, resolving relative dates and config defaults.
    pub fn to_draft(&self, today: NaiveDate, config: &Config) -> Result<EventDraft> {
        let date = parse_date(&self.date, today)?;
        let end_date = self
            .until
            .as_deref()
            .map(|until| parse_date(until, today))
            .transpose()?;
        let notification_time =
            check_notification_minutes(self.notify.unwrap_or(config.default_notification_minutes))?;

        Ok(EventDraft {
            title: self.title.trim().to_string(),
            date,
            start_time: self.start,
            end_time: self.end,
            description: self.description.clone(),
            location: self.location.clone(),
            category: self
                .category
                .clone()
                .unwrap_or_else(|| config.default_category.clone()),
            repeat: RepeatRule::every(self.repeat, self.interval, end_date),
            notification_time,
        })
    }
}

/// One-line description of an event: `title (date start-end)`.
pub fn describe(event: &Event) -> String {
    format!(
        "{} ({} {}-{})",
        event.title, event.date, event.start_time, event.end_time
    )
}

/// Writes the list of events a candidate clashes with.
pub fn write_conflicts<W: Write>(writer: &mut W, conflicts: &[&Event]) -> Result<()> {
    writeln!(writer, "Conflicts with:")?;
    for event in conflicts {
        writeln!(writer, "- {} [{}]", describe(event), event.id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 15).unwrap()
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("2025-01-31", today()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
        );
    }

    #[test]
    fn parses_relative_dates() {
        assert_eq!(parse_date("today", today()).unwrap(), today());
        assert_eq!(
            parse_date("Tomorrow", today()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 10, 16).unwrap()
        );
        assert_eq!(
            parse_date("in 3 days", today()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 10, 18).unwrap()
        );
        assert_eq!(
            parse_date("in 1 week", today()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 10, 22).unwrap()
        );
        assert_eq!(
            parse_date("in 2 weeks", today()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 10, 29).unwrap()
        );
    }

    #[test]
    fn rejects_unparseable_dates() {
        for input in ["2025-02-30", "next friday", "in -1 days", "3 days ago", ""] {
            let err = parse_date(input, today()).unwrap_err();
            assert!(
                err.to_string().contains("Invalid date"),
                "{input}: unexpected error {err}"
            );
        }
    }

    #[test]
    fn rejects_far_relative_dates() {
        let err = parse_date("in 99999 weeks", today()).unwrap_err();
        assert!(err.to_string().contains("too far away"));
    }

    #[test]
    fn parses_moments() {
        assert_eq!(
            parse_moment("2025-10-15T09:50").unwrap(),
            today().and_hms_opt(9, 50, 0).unwrap()
        );
        assert!(parse_moment("2025-10-15 09:50").is_err());
    }

    #[test]
    fn notification_minutes_must_be_an_offered_option() {
        assert_eq!(check_notification_minutes(10).unwrap(), 10);
        assert_eq!(check_notification_minutes(1440).unwrap(), 1440);
        let err = check_notification_minutes(15).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid reminder lead time: 15 minutes. Choose one of 1, 10, 60, 120, 1440"
        );
    }

    #[test]
    fn new_event_ids_are_unique() {
        assert_ne!(new_event_id(), new_event_id());
    }
}
