//! Upcoming command: shows reminders due at a given moment.

use std::collections::HashSet;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDateTime};
use kal_core::due_notifications;
use kal_db::Database;

use super::util::parse_moment;
use crate::cli::UpcomingArgs;

/// Reminder lead times never exceed a day, so only today and tomorrow are scanned.
const SCAN_DAYS: u64 = 2;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &UpcomingArgs,
    now: NaiveDateTime,
) -> Result<()> {
    let now = match &args.at {
        Some(at) => parse_moment(at)?,
        None => now,
    };
    let start = now.date();
    let end = start
        .checked_add_days(Days::new(SCAN_DAYS))
        .context("date out of range")?;

    let events = db
        .list_events_in_range(start, end)
        .context("failed to load events")?;
    let due = due_notifications(&events, now, &HashSet::new());
    tracing::debug!(scanned = events.len(), due = due.len(), %now, "checked reminders");

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&due)?)?;
        return Ok(());
    }

    if due.is_empty() {
        writeln!(writer, "No reminders due.")?;
        return Ok(());
    }
    for notification in &due {
        writeln!(writer, "- {} [{}]", notification.message, notification.event_id)?;
    }
    Ok(())
}
