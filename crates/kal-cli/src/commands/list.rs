//! List command for showing stored events.

use std::fmt::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use kal_core::Event;
use kal_db::Database;

use super::util::parse_date;
use crate::cli::ListArgs;

const TITLE_WIDTH: usize = 24;

/// Loads events matching the date bounds and search term.
///
/// Both bounds are inclusive.
pub fn get_events_for_display(
    db: &Database,
    args: &ListArgs,
    today: NaiveDate,
) -> Result<Vec<Event>> {
    let from = args
        .from
        .as_deref()
        .map(|s| parse_date(s, today))
        .transpose()?;
    let to = args
        .to
        .as_deref()
        .map(|s| parse_date(s, today))
        .transpose()?;

    let events = db.list_events().context("failed to load events")?;
    Ok(events
        .into_iter()
        .filter(|event| from.is_none_or(|from| event.date >= from))
        .filter(|event| to.is_none_or(|to| event.date <= to))
        .filter(|event| {
            args.search
                .as_deref()
                .is_none_or(|term| event.matches_query(term))
        })
        .collect())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(width - 1).collect();
    truncated.push('…');
    truncated
}

/// Format events for human-readable output.
pub fn format_events(events: &[Event]) -> String {
    let mut output = String::new();

    if events.is_empty() {
        writeln!(output, "No events found.").unwrap();
        return output;
    }

    writeln!(
        output,
        "{:<10}  {:<11}  {:<TITLE_WIDTH$}  {:<10}  {:<7}  ID",
        "Date", "Time", "Title", "Category", "Repeat"
    )
    .unwrap();
    writeln!(
        output,
        "──────────  ───────────  ────────────────────────  ──────────  ───────  ──────────"
    )
    .unwrap();

    for event in events {
        let time = format!("{}-{}", event.start_time, event.end_time);
        let repeat = if event.is_recurring {
            event.repeat.kind.as_str()
        } else {
            "-"
        };
        writeln!(
            output,
            "{:<10}  {:<11}  {:<TITLE_WIDTH$}  {:<10}  {:<7}  {}",
            event.date.to_string(),
            time,
            truncate(&event.title, TITLE_WIDTH),
            truncate(&event.category, 10),
            repeat,
            event.id
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "{} event(s)", events.len()).unwrap();
    output
}

pub fn run<W: std::io::Write>(
    writer: &mut W,
    db: &Database,
    args: &ListArgs,
    today: NaiveDate,
) -> Result<()> {
    let events = get_events_for_display(db, args, today)?;
    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&events)?)?;
    } else {
        write!(writer, "{}", format_events(&events))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use kal_core::{RepeatRule, RepeatType, recurrence};

    use super::*;
    use crate::commands::test_support::{event, today};

    fn populated_db() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        let mut gym = event("gym", "2025-10-28", "18:00", "19:00");
        gym.title = "Gym".to_string();
        gym.category = "Personal".to_string();
        gym.repeat = RepeatRule::every(RepeatType::Daily, 1, None);
        db.insert_events(&recurrence::expand(&gym).unwrap()).unwrap();

        let mut review = event("review", "2025-10-28", "09:00", "10:00");
        review.title = "Quarterly planning review with finance".to_string();
        review.location = "Room 4".to_string();
        db.insert_events(&[review]).unwrap();
        db
    }

    #[test]
    fn list_formats_table() {
        let db = populated_db();
        let mut output = Vec::new();
        run(&mut output, &db, &ListArgs::default(), today()).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        Date        Time         Title                     Category    Repeat   ID
        ──────────  ───────────  ────────────────────────  ──────────  ───────  ──────────
        2025-10-28  09:00-10:00  Quarterly planning revi…  Work        -        review
        2025-10-28  18:00-19:00  Gym                       Personal    daily    gym
        2025-10-29  18:00-19:00  Gym                       Personal    daily    gym-1
        2025-10-30  18:00-19:00  Gym                       Personal    daily    gym-2

        4 event(s)
        ");
    }

    #[test]
    fn list_filters_by_date_range() {
        let db = populated_db();
        let args = ListArgs {
            from: Some("2025-10-29".to_string()),
            to: Some("2025-10-29".to_string()),
            ..ListArgs::default()
        };

        let events = get_events_for_display(&db, &args, today()).unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["gym-1"]);
    }

    #[test]
    fn list_filters_by_search_term() {
        let db = populated_db();
        let args = ListArgs {
            search: Some("room 4".to_string()),
            ..ListArgs::default()
        };

        let events = get_events_for_display(&db, &args, today()).unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["review"]);
    }

    #[test]
    fn list_empty() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, &ListArgs::default(), today()).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @"No events found.");
    }

    #[test]
    fn list_json() {
        let db = populated_db();
        let args = ListArgs {
            json: true,
            ..ListArgs::default()
        };
        let mut output = Vec::new();
        run(&mut output, &db, &args, today()).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 4);
        assert_eq!(parsed[0]["id"], "review");
        assert_eq!(parsed[0]["startTime"], "09:00");
        assert_eq!(parsed[1]["repeat"]["type"], "daily");
    }
}
