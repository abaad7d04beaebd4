//! Edit command: changes one stored event.
//!
//! Editing an occurrence of a series detaches it: it keeps its ID but loses
//! its repeat rule and series link. Siblings are left as they are.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use kal_core::{EventDraft, find_overlaps};
use kal_db::Database;

use super::util::{check_notification_minutes, describe, parse_date, write_conflicts};
use crate::cli::EditArgs;

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &EditArgs,
    today: NaiveDate,
) -> Result<()> {
    let Some(original) = db.get_event(&args.id)? else {
        bail!("event not found: {}", args.id);
    };
    let was_in_series = original.is_recurring || original.original_id.is_some();

    let mut edited = original.detached();
    if let Some(title) = &args.title {
        edited.title = title.trim().to_string();
    }
    if let Some(date) = &args.date {
        edited.date = parse_date(date, today)?;
    }
    if let Some(start) = args.start {
        edited.start_time = start;
    }
    if let Some(end) = args.end {
        edited.end_time = end;
    }
    if let Some(description) = &args.description {
        edited.description.clone_from(description);
    }
    if let Some(location) = &args.location {
        edited.location.clone_from(location);
    }
    if let Some(category) = &args.category {
        edited.category.clone_from(category);
    }
    if let Some(minutes) = args.notify {
        edited.notification_time = check_notification_minutes(minutes)?;
    }
    EventDraft::from(edited.clone()).validate()?;

    let existing = db.list_events().context("failed to load events")?;
    let conflicts = find_overlaps(std::slice::from_ref(&edited), &existing);
    if !conflicts.is_empty() {
        write_conflicts(writer, &conflicts)?;
        if !args.force {
            bail!(
                "edit conflicts with {} existing event(s); re-run with --force to save anyway",
                conflicts.len()
            );
        }
        tracing::warn!(id = %edited.id, conflicts = conflicts.len(), "saving edit despite conflicts");
    }

    if !db.update_event(&edited)? {
        bail!("event not found: {}", args.id);
    }
    tracing::info!(id = %edited.id, detached = was_in_series, "updated event");

    writeln!(writer, "Updated event {}: {}", edited.id, describe(&edited))?;
    if was_in_series {
        writeln!(writer, "Detached from its series; other occurrences are unchanged.")?;
    }
    Ok(())
}
