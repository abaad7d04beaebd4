//! Reminder due-scan over stored events.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::event::Event;
use crate::types::EventId;

/// Reminder lead times, in minutes, offered when creating an event.
pub const NOTIFICATION_OPTIONS: [u32; 5] = [1, 10, 60, 120, 1440];

/// A reminder that should be shown now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub event_id: EventId,
    pub message: String,
}

/// Finds events whose reminder window contains `now`.
///
/// An event is due when it starts after `now` and no more than its
/// `notification_time` minutes later. Events already in `notified` are
/// skipped so a polling caller reports each reminder once.
pub fn due_notifications(
    events: &[Event],
    now: NaiveDateTime,
    notified: &HashSet<EventId>,
) -> Vec<Notification> {
    events
        .iter()
        .filter(|event| !notified.contains(&event.id))
        .filter_map(|event| {
            let until_start = event.starts_at() - now;
            let lead = chrono::Duration::minutes(i64::from(event.notification_time));
            (until_start > chrono::Duration::zero() && until_start <= lead).then(|| Notification {
                event_id: event.id.clone(),
                message: format!(
                    "{} starts in {} minutes",
                    event.title, event.notification_time
                ),
            })
        })
        .collect()
}
