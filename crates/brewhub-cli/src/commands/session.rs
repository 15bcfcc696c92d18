use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use brewhub_core::{AlertDispatcher, BrewSession, Config, Database, Ticker};
use clap::Subcommand;

use crate::common::{self, DbInventory, TerminalAlert};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Print current session state as JSON
    Status,
    /// Start or resume the session clock
    Start,
    /// Pause the session clock
    Pause,
    /// Reset the session to idle
    Reset,
    /// Finish the session and persist a brew log
    Finish,
    /// Drive the session live in the foreground (Ctrl-C pauses)
    Run,
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let (mut session, catch_up) = common::load_session(&db);
    session.set_default_rating(config.brew.default_rating);
    let dispatcher = AlertDispatcher::new(config.notifications.clone());

    // A step threshold may have passed while no CLI process was alive.
    if let Some(event) = catch_up {
        dispatcher.dispatch(&mut TerminalAlert);
        common::print_json(&event)?;
    }

    match action {
        SessionAction::Status => {
            common::print_json(&session.snapshot())?;
        }
        SessionAction::Start => {
            if session.recipe().is_none() {
                return Err(
                    "no recipe selected; run `brewhub-cli recipe select <id>` first".into(),
                );
            }
            match session.start() {
                Some(event) => common::print_json(&event)?,
                None => common::print_json(&session.snapshot())?,
            }
        }
        SessionAction::Pause => match session.pause() {
            Some(event) => common::print_json(&event)?,
            None => common::print_json(&session.snapshot())?,
        },
        SessionAction::Reset => {
            let event = session.reset();
            common::print_json(&event)?;
        }
        SessionAction::Finish => {
            let bean_id = session.bean().map(|b| b.id.clone());
            let mut inventory = DbInventory::new(&db);
            if let Some(event) = session.finish(&db, &mut inventory) {
                common::print_json(&event)?;
            }
            if let Some(bean_id) = bean_id {
                if let Some(bean) = inventory.beans.iter().find(|b| b.id == bean_id) {
                    println!("{}: {:.0}g left", bean.name, bean.stock_grams);
                }
            }
        }
        SessionAction::Run => {
            return run_live(&db, session, &dispatcher);
        }
    }

    common::save_session(&db, &session)
}

/// Foreground timer loop: one tick source drives the shared session,
/// alerts ring the terminal bell, Ctrl-C pauses and persists.
fn run_live(
    db: &Database,
    mut session: BrewSession,
    dispatcher: &AlertDispatcher,
) -> Result<(), Box<dyn std::error::Error>> {
    if session.recipe().is_none() {
        return Err("no recipe selected; run `brewhub-cli recipe select <id>` first".into());
    }
    if let Some(event) = session.start() {
        common::print_json(&event)?;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let session = Arc::new(Mutex::new(session));
    runtime.block_on(async {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut ticker = Ticker::new();
        ticker.start(session.clone(), tx);

        let mut alert = TerminalAlert;
        let mut status = tokio::time::interval(Duration::from_secs(1));
        loop {
            tokio::select! {
                event = rx.recv() => {
                    match event {
                        Some(event) => {
                            println!();
                            dispatcher.dispatch(&mut alert);
                            common::print_json(&event)?;
                        }
                        None => break,
                    }
                }
                _ = status.tick() => {
                    let line = {
                        let session = session.lock().unwrap();
                        status_line(&session)
                    };
                    print!("\r{line}   ");
                    std::io::stdout().flush().ok();
                }
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    break;
                }
            }
        }
        ticker.stop();

        let mut session = session.lock().unwrap();
        if let Some(event) = session.pause() {
            common::print_json(&event)?;
        }
        common::save_session(db, &session)
    })
}

fn status_line(session: &BrewSession) -> String {
    let ms = session.elapsed_ms();
    let total_secs = ms / 1000;
    let tenths = (ms % 1000) / 100;
    let step = session
        .current_step()
        .map(|s| s.label.clone())
        .unwrap_or_else(|| "-".into());
    let total_water = session
        .recipe()
        .map(|r| r.total_water_ml)
        .unwrap_or_default();
    format!(
        "{}:{:02}.{}  {}  {} / {} ml",
        total_secs / 60,
        total_secs % 60,
        tenths,
        step,
        session.poured_ml(),
        total_water,
    )
}
