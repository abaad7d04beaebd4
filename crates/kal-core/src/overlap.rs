//! Overlap detection between candidate occurrences and stored events.

use std::collections::HashSet;

use crate::event::Event;
use crate::recurrence::{self, RecurrenceError};
use crate::types::EventId;

/// Whether two events share a date and their `[start, end)` times intersect.
///
/// Touching intervals (one ends exactly when the other starts) do not overlap.
pub fn is_overlapping(a: &Event, b: &Event) -> bool {
    a.date == b.date && a.start_time < b.end_time && b.start_time < a.end_time
}

/// Returns the events in `existing` that overlap any of `candidates`.
///
/// `candidates` is an already-expanded series (or a single event). Existing
/// events with a candidate's ID are never reported. Occurrences derived from
/// a candidate are skipped only while that candidate is still a recurring
/// seed; once detached, its former siblings are ordinary events. Matches keep
/// their relative order from `existing` and appear once each.
pub fn find_overlaps<'a>(candidates: &[Event], existing: &'a [Event]) -> Vec<&'a Event> {
    let own_ids: HashSet<&EventId> = candidates.iter().map(|c| &c.id).collect();
    let own_series: HashSet<&EventId> = candidates
        .iter()
        .filter(|c| c.is_recurring && c.original_id.is_none())
        .map(|c| &c.id)
        .collect();
    let is_own =
        |event: &Event| own_ids.contains(&event.id) || own_series.contains(event.series_id());

    let overlaps: Vec<&Event> = existing
        .iter()
        .filter(|event| !is_own(event))
        .filter(|event| candidates.iter().any(|c| is_overlapping(c, event)))
        .collect();

    tracing::debug!(
        candidates = candidates.len(),
        existing = existing.len(),
        overlaps = overlaps.len(),
        "checked for overlaps"
    );
    overlaps
}

/// Expands `seed` and checks every occurrence it would produce.
pub fn find_series_overlaps<'a>(
    seed: &Event,
    existing: &'a [Event],
) -> Result<Vec<&'a Event>, RecurrenceError> {
    let occurrences = recurrence::expand(seed)?;
    Ok(find_overlaps(&occurrences, existing))
}
