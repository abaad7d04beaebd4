//! Add command: expands a new event and saves it unless it conflicts.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use kal_core::{EventId, find_overlaps, recurrence};
use kal_db::Database;

use super::util::write_conflicts;
use crate::Config;
use crate::cli::AddArgs;

/// Creates the event described by `args` under `id`.
///
/// Conflicting events are listed and the save is refused unless `--force`
/// is given.
pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &AddArgs,
    config: &Config,
    today: NaiveDate,
    id: EventId,
) -> Result<()> {
    let draft = args.draft.to_draft(today, config)?;
    draft.validate()?;

    let seed = draft.into_event(id);
    let occurrences = recurrence::expand(&seed)?;

    let existing = db.list_events().context("failed to load events")?;
    let conflicts = find_overlaps(&occurrences, &existing);
    if !conflicts.is_empty() {
        write_conflicts(writer, &conflicts)?;
        if !args.force {
            bail!(
                "event conflicts with {} existing event(s); re-run with --force to save anyway",
                conflicts.len()
            );
        }
        tracing::warn!(
            id = %seed.id,
            conflicts = conflicts.len(),
            "saving despite conflicts"
        );
    }

    let inserted = db.insert_events(&occurrences)?;
    tracing::info!(id = %seed.id, inserted, "created event");

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&occurrences)?)?;
        return Ok(());
    }

    writeln!(writer, "Created event {}: {}", seed.id, seed.title)?;
    if let [first, .., last] = occurrences.as_slice() {
        writeln!(
            writer,
            "Occurrences: {} ({} to {})",
            occurrences.len(),
            first.date,
            last.date
        )?;
    }
    Ok(())
}
