//! Storage layer for the kal calendar.
//!
//! Persists event occurrences using `rusqlite`. Every occurrence of a
//! recurring series is its own row; updating or deleting one row never
//! touches its siblings.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! Dates are stored as TEXT in `YYYY-MM-DD` form and times as `HH:MM`, so
//! lexicographic ordering matches chronological ordering.

use std::path::Path;

use chrono::NaiveDate;
use kal_core::{Event, EventId, RepeatRule, WallTime};
use rusqlite::{Connection, OptionalExtension, Row, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored row could not be decoded into an event.
    #[error("invalid event data for {event_id}: {message}")]
    InvalidEventData { event_id: String, message: String },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

const EVENT_COLUMNS: &str = "
    id, title, date, start_time, end_time, description, location, category,
    repeat_type, repeat_interval, repeat_end_date, notification_time, is_recurring, original_id
";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- One row per occurrence.
            -- date: 'YYYY-MM-DD'; start_time/end_time: 'HH:MM'
            -- original_id: seed event ID for derived occurrences
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                location TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT '',
                repeat_type TEXT NOT NULL DEFAULT 'none',
                repeat_interval INTEGER NOT NULL DEFAULT 1,
                repeat_end_date TEXT,
                notification_time INTEGER NOT NULL DEFAULT 10,
                is_recurring INTEGER NOT NULL DEFAULT 0,
                original_id TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_events_date ON events(date, start_time);
            CREATE INDEX IF NOT EXISTS idx_events_original ON events(original_id);
            ",
        )?;
        Ok(())
    }

    /// Inserts a batch of events in one transaction, ignoring duplicates by ID.
    ///
    /// Returns the number of rows written.
    pub fn insert_events(&mut self, events: &[Event]) -> Result<usize, DbError> {
        if events.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT OR IGNORE INTO events ({EVENT_COLUMNS})
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            ))?;
            for event in events {
                let row = EventRow::from(event);
                inserted += stmt.execute(params![
                    row.id,
                    row.title,
                    row.date,
                    row.start_time,
                    row.end_time,
                    row.description,
                    row.location,
                    row.category,
                    row.repeat_type,
                    row.repeat_interval,
                    row.repeat_end_date,
                    row.notification_time,
                    row.is_recurring,
                    row.original_id,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(requested = events.len(), inserted, "inserted events");
        Ok(inserted)
    }

    /// Fetches one event by ID.
    pub fn get_event(&self, id: &str) -> Result<Option<Event>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"),
                [id],
                EventRow::from_row,
            )
            .optional()?;
        row.map(Event::try_from).transpose()
    }

    /// Lists all events ordered by date, start time, then ID.
    pub fn list_events(&self) -> Result<Vec<Event>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC, start_time ASC, id ASC"
        ))?;
        let rows = stmt.query_map([], EventRow::from_row)?;
        let mut events = Vec::new();
        for row in rows {
            events.push(Event::try_from(row?)?);
        }
        Ok(events)
    }

    /// Lists events within a date range.
    ///
    /// The range is inclusive of `start` and exclusive of `end`.
    pub fn list_events_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Event>, DbError> {
        if end <= start {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(&format!(
            "
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE date >= ? AND date < ?
            ORDER BY date ASC, start_time ASC, id ASC
            "
        ))?;
        let rows = stmt.query_map([format_date(start), format_date(end)], EventRow::from_row)?;
        let mut events = Vec::new();
        for row in rows {
            events.push(Event::try_from(row?)?);
        }
        Ok(events)
    }

    /// Replaces the stored row with the same ID.
    ///
    /// Returns `false` when no event has that ID.
    pub fn update_event(&mut self, event: &Event) -> Result<bool, DbError> {
        let row = EventRow::from(event);
        let updated = self.conn.execute(
            "
            UPDATE events SET
                title = ?, date = ?, start_time = ?, end_time = ?,
                description = ?, location = ?, category = ?,
                repeat_type = ?, repeat_interval = ?, repeat_end_date = ?,
                notification_time = ?, is_recurring = ?, original_id = ?
            WHERE id = ?
            ",
            params![
                row.title,
                row.date,
                row.start_time,
                row.end_time,
                row.description,
                row.location,
                row.category,
                row.repeat_type,
                row.repeat_interval,
                row.repeat_end_date,
                row.notification_time,
                row.is_recurring,
                row.original_id,
                row.id,
            ],
        )?;
        tracing::debug!(id = %event.id, updated, "updated event");
        Ok(updated > 0)
    }

    /// Deletes one event by ID.
    ///
    /// Returns `false` when no event has that ID.
    pub fn delete_event(&mut self, id: &str) -> Result<bool, DbError> {
        let deleted = self.conn.execute("DELETE FROM events WHERE id = ?", [id])?;
        tracing::debug!(id, deleted, "deleted event");
        Ok(deleted > 0)
    }
}

/// An event as stored in the `events` table.
#[derive(Debug)]
struct EventRow {
    id: String,
    title: String,
    date: String,
    start_time: String,
    end_time: String,
    description: String,
    location: String,
    category: String,
    repeat_type: String,
    repeat_interval: i64,
    repeat_end_date: Option<String>,
    notification_time: i64,
    is_recurring: bool,
    original_id: Option<String>,
}

impl EventRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            date: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            description: row.get(5)?,
            location: row.get(6)?,
            category: row.get(7)?,
            repeat_type: row.get(8)?,
            repeat_interval: row.get(9)?,
            repeat_end_date: row.get(10)?,
            notification_time: row.get(11)?,
            is_recurring: row.get(12)?,
            original_id: row.get(13)?,
        })
    }
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            title: event.title.clone(),
            date: format_date(event.date),
            start_time: event.start_time.to_string(),
            end_time: event.end_time.to_string(),
            description: event.description.clone(),
            location: event.location.clone(),
            category: event.category.clone(),
            repeat_type: event.repeat.kind.as_str().to_string(),
            repeat_interval: i64::from(event.repeat.interval),
            repeat_end_date: event.repeat.end_date.map(format_date),
            notification_time: i64::from(event.notification_time),
            is_recurring: event.is_recurring,
            original_id: event.original_id.as_ref().map(ToString::to_string),
        }
    }
}

impl TryFrom<EventRow> for Event {
    type Error = DbError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let invalid = |message: String| DbError::InvalidEventData {
            event_id: row.id.clone(),
            message,
        };

        let id = EventId::new(row.id.clone()).map_err(|e| invalid(e.to_string()))?;
        let date = parse_date(&row.date).map_err(&invalid)?;
        let start_time: WallTime = row
            .start_time
            .parse()
            .map_err(|e: kal_core::ValidationError| invalid(e.to_string()))?;
        let end_time: WallTime = row
            .end_time
            .parse()
            .map_err(|e: kal_core::ValidationError| invalid(e.to_string()))?;
        let kind = row
            .repeat_type
            .parse()
            .map_err(|e: kal_core::ValidationError| invalid(e.to_string()))?;
        let interval = u32::try_from(row.repeat_interval)
            .map_err(|_| invalid(format!("invalid repeat interval {}", row.repeat_interval)))?;
        let end_date = row
            .repeat_end_date
            .as_deref()
            .map(parse_date)
            .transpose()
            .map_err(&invalid)?;
        let notification_time = u32::try_from(row.notification_time).map_err(|_| {
            invalid(format!(
                "invalid notification time {}",
                row.notification_time
            ))
        })?;
        let original_id = row
            .original_id
            .clone()
            .map(EventId::new)
            .transpose()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            id,
            title: row.title,
            date,
            start_time,
            end_time,
            description: row.description,
            location: row.location,
            category: row.category,
            repeat: RepeatRule::every(kind, interval, end_date),
            notification_time,
            is_recurring: row.is_recurring,
            original_id,
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("invalid date {value}: {e}"))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
