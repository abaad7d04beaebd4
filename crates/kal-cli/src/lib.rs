//! Calendar CLI library.
//!
//! This crate provides the CLI interface for the kal calendar.

mod cli;
pub mod commands;
mod config;

pub use cli::{AddArgs, Cli, Commands, DraftArgs, EditArgs, ListArgs, UpcomingArgs};
pub use config::Config;
