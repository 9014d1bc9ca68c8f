//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `boolchart_core` linkage and storage wiring end to end.
//! - Print a plain-text view of the stored cards.
//!

use boolchart_core::calendar::{chunk_into_weeks, entry_index};
use boolchart_core::db::{open_db, CARDS_DB_FILE_NAME};
use boolchart_core::{
    default_log_level, init_logging, Card, CardService, EntryState, SqliteKeyValueRepository,
};
use chrono::{DateTime, Local};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "boolchart_cli")]
#[command(about = "Print the habit cards stored in a BoolChart database")]
struct Cli {
    /// SQLite database file holding the cards
    #[arg(default_value = CARDS_DB_FILE_NAME)]
    db_path: PathBuf,

    /// Drop stored cards and reseed the defaults before printing
    #[arg(long)]
    reset: bool,
}

fn main() -> ExitCode {
    let Cli { db_path, reset } = Cli::parse();

    if let Ok(cwd) = std::env::current_dir() {
        let log_dir = cwd.join("logs");
        if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("boolchart_core ping={}", boolchart_core::ping());
    println!("boolchart_core version={}", boolchart_core::core_version());

    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open `{}`: {err}", db_path.display());
            return ExitCode::FAILURE;
        }
    };
    let mut service = CardService::open(SqliteKeyValueRepository::new(&conn));
    if reset {
        service.reset();
    }

    let now = service.now();
    for card in service.cards() {
        print_card(card, &now);
    }
    if let Some(err) = service.last_save_error() {
        eprintln!("warning: cards were not saved: {err}");
    }
    ExitCode::SUCCESS
}

fn print_card(card: &Card, now: &DateTime<Local>) {
    let (year, month) = card.tracked_month();
    let archived = if card.is_archived(now) { " [archived]" } else { "" };
    println!(
        "\n{} ({year}-{:02}) {}/{}{archived}",
        card.name,
        month + 1,
        card.completed_count(),
        card.entries.len()
    );

    for (week, days) in chunk_into_weeks(&card.entries).iter().enumerate() {
        let row: String = (0..days.len())
            .map(|offset| match card.entry_state(entry_index(week, offset)) {
                Some(EntryState::PreTracking) => '-',
                Some(EntryState::Complete) => '#',
                Some(EntryState::Incomplete) | None => '.',
            })
            .collect();
        println!("w{week} {row}");
    }
}
