mod cli;
mod config;
mod db;
mod models;
mod stats;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;
use db::repository::MetaRepo;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    // Enable WAL mode for better concurrent access
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    match cli.command {
        Some(Commands::Add(args)) => {
            handlers::handle_add(&conn, &config, &args)?;
        }
        Some(Commands::List { all }) => {
            handlers::handle_list(&conn, &config, all)?;
        }
        Some(Commands::Check {
            habit,
            value,
            note,
            date,
            skip,
            undo,
        }) => {
            handlers::handle_check(
                &conn,
                &config,
                &habit,
                value,
                note.as_deref(),
                date.as_deref(),
                skip,
                undo,
            )?;
        }
        Some(Commands::Stats { habit, week }) => {
            handlers::handle_stats(&conn, &config, habit.as_deref(), week)?;
        }
        Some(Commands::Achievements) => {
            handlers::handle_achievements(&conn, &config)?;
        }
        Some(Commands::Templates) => {
            handlers::handle_templates(&config)?;
        }
        Some(Commands::Archive { habit }) => {
            handlers::handle_archive(&conn, &habit)?;
        }
        Some(Commands::Export { json }) => {
            handlers::handle_export(&conn, &config, json)?;
        }

        // No subcommand → launch TUI
        None => {
            first_run_hint(&conn)?;
            tui::app::run(conn, config)?;
        }
    }

    Ok(())
}

/// Print a one-time pointer at the CLI on the very first launch.
fn first_run_hint(conn: &Connection) -> Result<()> {
    if MetaRepo::get(conn, "first_run_done")?.as_deref() != Some("1") {
        eprintln!("Welcome to groove! Add your first habit with `groove add \"Read\"`,");
        eprintln!("or press [?] inside the dashboard for keybindings.");
        eprintln!();
        MetaRepo::set(conn, "first_run_done", "1")?;
    }
    Ok(())
}
