use brewhub_core::Database;
use clap::Subcommand;

use crate::common;

#[derive(Subcommand)]
pub enum LogAction {
    /// List brew logs, newest first
    List {
        #[arg(long)]
        limit: Option<u32>,
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Update the rating (and optional memo) on a log
    Rate {
        id: String,
        rating: u8,
        #[arg(long)]
        memo: Option<String>,
    },
    /// Print aggregate brewing statistics as JSON
    Stats,
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        LogAction::List { limit, json } => {
            let logs = db.list_brew_logs(limit)?;
            if json {
                common::print_json(&logs)?;
            } else {
                for log in logs {
                    println!(
                        "{}  {}  {}s  {}/5",
                        log.id,
                        log.brew_date.format("%Y-%m-%d %H:%M"),
                        log.actual_duration,
                        log.rating,
                    );
                }
            }
        }
        LogAction::Rate { id, rating, memo } => {
            db.rate_brew_log(&id, rating, memo.as_deref())?;
            println!("Log {id} rated {rating}/5");
        }
        LogAction::Stats => {
            common::print_json(&db.brew_stats()?)?;
        }
    }
    Ok(())
}
