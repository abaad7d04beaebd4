//! CLI command implementations.

pub mod add;
pub mod check;
pub mod delete;
pub mod edit;
pub mod list;
pub mod upcoming;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use kal_core::{Event, EventId, RepeatRule, RepeatType};

    use crate::Config;
    use crate::cli::DraftArgs;

    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    pub fn config() -> Config {
        Config {
            database_path: "unused.db".into(),
            default_notification_minutes: 10,
            default_category: "Work".to_string(),
        }
    }

    pub fn draft(title: &str, date: &str, start: &str, end: &str) -> DraftArgs {
        DraftArgs {
            title: title.to_string(),
            date: date.to_string(),
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
            description: String::new(),
            location: String::new(),
            category: None,
            notify: None,
            repeat: RepeatType::None,
            interval: 1,
            until: None,
        }
    }

    pub fn event(id: &str, date: &str, start: &str, end: &str) -> Event {
        Event {
            id: EventId::new(id).unwrap(),
            title: format!("Event {id}"),
            date: date.parse().unwrap(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            description: String::new(),
            location: String::new(),
            category: "Work".to_string(),
            repeat: RepeatRule::none(),
            notification_time: 10,
            is_recurring: false,
            original_id: None,
        }
    }
}
