use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kal_cli::commands::{add, check, delete, edit, list, upcoming, util};
use kal_cli::{Cli, Commands, Config};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(kal_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = kal_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let now = Local::now().naive_local();
    let today = now.date();
    let mut stdout = std::io::stdout();

    match &cli.command {
        Some(Commands::Add(args)) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            add::run(&mut stdout, &mut db, args, &config, today, util::new_event_id())?;
        }
        Some(Commands::Check(args)) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            check::run(&mut stdout, &db, args, &config, today)?;
        }
        Some(Commands::Edit(args)) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            edit::run(&mut stdout, &mut db, args, today)?;
        }
        Some(Commands::Delete { id }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            delete::run(&mut stdout, &mut db, id)?;
        }
        Some(Commands::List(args)) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            list::run(&mut stdout, &db, args, today)?;
        }
        Some(Commands::Upcoming(args)) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            upcoming::run(&mut stdout, &db, args, now)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
