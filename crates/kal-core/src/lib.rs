//! Core domain logic for the kal calendar.
//!
//! This crate contains the fundamental types and logic for:
//! - Events: the dated calendar entries and the drafts they are built from
//! - Recurrence: expanding a seed event into its bounded list of occurrences
//! - Overlap detection: finding stored events that clash with a candidate
//! - Notifications: deciding which reminders are due

pub mod event;
pub mod notification;
pub mod overlap;
pub mod recurrence;
pub mod repeat;
pub mod types;

pub use event::{Event, EventDraft};
pub use notification::{Notification, due_notifications};
pub use overlap::{find_overlaps, find_series_overlaps, is_overlapping};
pub use recurrence::{HORIZON, RecurrenceError, expand};
pub use repeat::{RepeatRule, RepeatType};
pub use types::{EventId, ValidationError, WallTime};
