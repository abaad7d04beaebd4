//! Repeat rules attached to seed events.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::ValidationError;

/// The kind of recurrence, as a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RepeatType {
    /// A standalone event.
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepeatType {
    /// String representation for storage and the wire format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Whether this rule produces more than the seed.
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for RepeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RepeatType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(ValidationError::UnknownRepeatType {
                value: s.to_string(),
            }),
        }
    }
}

impl Serialize for RepeatType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RepeatType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How a seed event repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatRule {
    #[serde(rename = "type")]
    pub kind: RepeatType,

    /// Step multiplier. Must be at least 1 for recurring rules; ignored for `none`.
    pub interval: u32,

    /// Last date (inclusive) an occurrence may fall on.
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
}

impl RepeatRule {
    /// A rule that never repeats.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: RepeatType::None,
            interval: 1,
            end_date: None,
        }
    }

    /// A recurring rule with the given step and optional end date.
    #[must_use]
    pub const fn every(kind: RepeatType, interval: u32, end_date: Option<NaiveDate>) -> Self {
        Self {
            kind,
            interval,
            end_date,
        }
    }

    /// Checks the rule's preconditions without expanding it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.kind.is_recurring() && self.interval == 0 {
            return Err(ValidationError::InvalidInterval {
                value: self.interval,
            });
        }
        Ok(())
    }
}

impl Default for RepeatRule {
    fn default() -> Self {
        Self::none()
    }
}

/// Reads an optional `YYYY-MM-DD` date, treating an empty string as absent.
///
/// Form drafts submit an empty end-date field when none was picked.
fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
