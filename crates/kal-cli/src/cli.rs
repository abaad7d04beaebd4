//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kal_core::{RepeatType, WallTime};

/// Calendar with recurring events.
///
/// Expands repeating events into dated occurrences and warns before saving
/// anything that clashes with events already on the calendar.
#[derive(Debug, Parser)]
#[command(name = "kal", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an event, expanding it if it repeats.
    Add(AddArgs),

    /// Preview an event's occurrences and conflicts without saving.
    Check(DraftArgs),

    /// Edit a single event. Editing an occurrence detaches it from its series.
    Edit(EditArgs),

    /// Delete a single event.
    Delete {
        /// ID of the event to delete.
        id: String,
    },

    /// List stored events.
    List(ListArgs),

    /// Show reminders that are due.
    Upcoming(UpcomingArgs),
}

/// Fields of an event as entered by the user.
#[derive(Debug, Clone, Args)]
pub struct DraftArgs {
    /// Event title.
    #[arg(long)]
    pub title: String,

    /// Date: YYYY-MM-DD, "today", "tomorrow", or "in N days/weeks".
    #[arg(long)]
    pub date: String,

    /// Start time (HH:MM).
    #[arg(long)]
    pub start: WallTime,

    /// End time (HH:MM).
    #[arg(long)]
    pub end: WallTime,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub location: String,

    /// Category (defaults to the configured category).
    #[arg(long)]
    pub category: Option<String>,

    /// Reminder lead time in minutes: 1, 10, 60, 120 or 1440.
    #[arg(long)]
    pub notify: Option<u32>,

    /// Repeat rule: none, daily, weekly, monthly or yearly.
    #[arg(long, default_value = "none")]
    pub repeat: RepeatType,

    /// Repeat every N days/weeks/months/years.
    #[arg(long, default_value_t = 1)]
    pub interval: u32,

    /// Last date of the series (inclusive).
    #[arg(long)]
    pub until: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub draft: DraftArgs,

    /// Save even if the event conflicts with existing events.
    #[arg(long)]
    pub force: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// ID of the event to edit.
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub start: Option<WallTime>,

    #[arg(long)]
    pub end: Option<WallTime>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub notify: Option<u32>,

    /// Save even if the edit conflicts with existing events.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// First date to include.
    #[arg(long)]
    pub from: Option<String>,

    /// Last date to include.
    #[arg(long)]
    pub to: Option<String>,

    /// Only events whose title, description, location or category contain this text.
    #[arg(long)]
    pub search: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct UpcomingArgs {
    /// Moment to check, as YYYY-MM-DDTHH:MM local time (defaults to now).
    #[arg(long)]
    pub at: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}
