//! Calendar events and the drafts they are created from.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::repeat::RepeatRule;
use crate::types::{EventId, ValidationError, WallTime};

/// A single dated calendar entry.
///
/// Every occurrence of a recurring series is its own `Event` value; nothing
/// is shared between siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: WallTime,
    pub end_time: WallTime,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub repeat: RepeatRule,
    /// Minutes before `start_time` at which a reminder fires.
    #[serde(default)]
    pub notification_time: u32,
    /// Set on every occurrence produced by a recurring rule, the first included.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_recurring: bool,
    /// The seed's ID, on occurrences after the first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<EventId>,
}

impl Event {
    /// The wall-clock moment the event starts.
    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time.to_naive_time())
    }

    /// The ID of the series this event belongs to: the seed's ID for derived
    /// occurrences, its own ID otherwise.
    #[must_use]
    pub fn series_id(&self) -> &EventId {
        self.original_id.as_ref().unwrap_or(&self.id)
    }

    /// Builds the `index`-th derived occurrence of this seed on `date`.
    #[must_use]
    pub fn occurrence(&self, index: usize, date: NaiveDate) -> Self {
        Self {
            id: self.id.occurrence(index),
            date,
            is_recurring: true,
            original_id: Some(self.id.clone()),
            ..self.clone()
        }
    }

    /// Detaches an edited occurrence from its series.
    ///
    /// The event keeps its ID but loses its series link and repeat rule.
    /// Siblings are not affected.
    #[must_use]
    pub fn detached(self) -> Self {
        Self {
            repeat: RepeatRule::none(),
            is_recurring: false,
            original_id: None,
            ..self
        }
    }

    /// Case-insensitive substring match on the event's display text.
    pub fn matches_query(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            &self.title,
            &self.description,
            &self.location,
            &self.category,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

/// An event as entered in a form, before it has been assigned an ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: WallTime,
    pub end_time: WallTime,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub repeat: RepeatRule,
    #[serde(default)]
    pub notification_time: u32,
}

impl EventDraft {
    /// Caller-side checks that must pass before a draft is expanded.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        if self.start_time >= self.end_time {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        self.repeat.validate()
    }

    /// Turns the draft into a seed event with the given ID.
    #[must_use]
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            title: self.title,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            description: self.description,
            location: self.location,
            category: self.category,
            repeat: self.repeat,
            notification_time: self.notification_time,
            is_recurring: false,
            original_id: None,
        }
    }
}

impl From<Event> for EventDraft {
    fn from(event: Event) -> Self {
        Self {
            title: event.title,
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            description: event.description,
            location: event.location,
            category: event.category,
            repeat: event.repeat,
            notification_time: event.notification_time,
        }
    }
}
