//! Check command: previews an event's occurrences and conflicts without saving.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use kal_core::{find_overlaps, recurrence};
use kal_db::Database;

use super::util::{new_event_id, write_conflicts};
use crate::Config;
use crate::cli::DraftArgs;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &DraftArgs,
    config: &Config,
    today: NaiveDate,
) -> Result<()> {
    let draft = args.to_draft(today, config)?;
    draft.validate()?;

    let seed = draft.into_event(new_event_id());
    let occurrences = recurrence::expand(&seed)?;
    let existing = db.list_events().context("failed to load events")?;
    let conflicts = find_overlaps(&occurrences, &existing);

    writeln!(writer, "Occurrences: {}", occurrences.len())?;
    for occurrence in &occurrences {
        writeln!(
            writer,
            "  {} {}-{}",
            occurrence.date, occurrence.start_time, occurrence.end_time
        )?;
    }

    if conflicts.is_empty() {
        writeln!(writer, "No conflicts.")?;
    } else {
        write_conflicts(writer, &conflicts)?;
    }
    Ok(())
}
