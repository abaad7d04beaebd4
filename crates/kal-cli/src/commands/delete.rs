//! Delete command: removes one stored event.

use std::io::Write;

use anyhow::{Result, bail};
use kal_db::Database;

/// Deletes only the named event; other occurrences of its series stay.
pub fn run<W: Write>(writer: &mut W, db: &mut Database, id: &str) -> Result<()> {
    if !db.delete_event(id)? {
        bail!("event not found: {id}");
    }
    tracing::info!(id, "deleted event");
    writeln!(writer, "Deleted event {id}")?;
    Ok(())
}
