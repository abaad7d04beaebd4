//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types and event drafts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A time-of-day string was not `HH:MM`.
    #[error("invalid time of day: {value} (expected HH:MM)")]
    InvalidTime { value: String },

    /// The start time is not strictly before the end time.
    #[error("start time {start} must be before end time {end}")]
    InvalidTimeRange { start: WallTime, end: WallTime },

    /// A repeat type string did not name a known rule.
    #[error("unknown repeat type: {value}")]
    UnknownRepeatType { value: String },

    /// A recurring rule had an interval below one.
    #[error("repeat interval must be at least 1, got {value}")]
    InvalidInterval { value: u32 },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated event identifier.
    ///
    /// Event IDs must be non-empty strings. Occurrences of a recurring series
    /// derive theirs from the seed ID (see [`EventId::occurrence`]).
    EventId, "event ID"
);

impl EventId {
    /// Returns the ID of the `index`-th occurrence derived from this seed ID.
    ///
    /// The seed itself is occurrence zero and keeps its unsuffixed ID, so
    /// callers pass indices starting at 1.
    #[must_use]
    pub fn occurrence(&self, index: usize) -> Self {
        Self(format!("{}-{index}", self.0))
    }
}

/// A wall-clock time of day with minute precision, written `HH:MM`.
///
/// Ordering follows the clock, so `WallTime` values can be compared directly
/// when checking intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallTime {
    minutes: u16,
}

impl WallTime {
    /// Creates a time from hour and minute, rejecting out-of-range values.
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidTime {
                value: format!("{hour:02}:{minute:02}"),
            });
        }
        Ok(Self {
            minutes: hour * 60 + minute,
        })
    }

    #[must_use]
    pub const fn hour(self) -> u16 {
        self.minutes / 60
    }

    #[must_use]
    pub const fn minute(self) -> u16 {
        self.minutes % 60
    }

    /// Converts to a `chrono` time for combining with a calendar date.
    #[must_use]
    pub fn to_naive_time(self) -> chrono::NaiveTime {
        chrono::NaiveTime::from_num_seconds_from_midnight_opt(u32::from(self.minutes) * 60, 0)
            .unwrap_or(chrono::NaiveTime::MIN)
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for WallTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTime {
            value: s.to_string(),
        };
        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        let is_two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !is_two_digits(hour) || !is_two_digits(minute) {
            return Err(invalid());
        }
        let hour: u16 = hour.parse().map_err(|_| invalid())?;
        let minute: u16 = minute.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for WallTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WallTime> for String {
    fn from(time: WallTime) -> Self {
        time.to_string()
    }
}
