//! Shared helpers for CLI commands.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use brewhub_core::error::CoreError;
use brewhub_core::session::BeanInventory;
use brewhub_core::{AlertSink, Bean, BrewSession, Database, Event};
use serde::{Deserialize, Serialize};

pub const SESSION_KEY: &str = "brew_session";

/// Session state as persisted in the kv table between CLI invocations.
#[derive(Serialize, Deserialize)]
pub struct PersistedSession {
    pub session: BrewSession,
    /// Wall-clock timestamp of the save (epoch ms). Elapsed wall time
    /// since then is credited to a running session on the next load.
    pub saved_at_ms: u64,
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Load the persisted session, crediting wall-clock time that passed
/// since the last save. Returns any step alert the catch-up produced.
pub fn load_session(db: &Database) -> (BrewSession, Option<Event>) {
    if let Ok(Some(json)) = db.kv_get(SESSION_KEY) {
        if let Ok(mut persisted) = serde_json::from_str::<PersistedSession>(&json) {
            let mut event = None;
            if persisted.session.is_running() {
                let delta = now_ms().saturating_sub(persisted.saved_at_ms);
                event = persisted.session.advance(delta);
            }
            return (persisted.session, event);
        }
    }
    (BrewSession::new(), None)
}

pub fn save_session(
    db: &Database,
    session: &BrewSession,
) -> Result<(), Box<dyn std::error::Error>> {
    let persisted = PersistedSession {
        session: session.clone(),
        saved_at_ms: now_ms(),
    };
    db.kv_set(SESSION_KEY, &serde_json::to_string(&persisted)?)?;
    Ok(())
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Terminal notification channel: BEL for the audio cue, a printed
/// line standing in for the haptic buzz.
pub struct TerminalAlert;

impl AlertSink for TerminalAlert {
    fn play_cue(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut out = std::io::stdout();
        out.write_all(b"\x07")?;
        out.flush()?;
        Ok(())
    }

    fn vibrate(&mut self, pattern: &[u64]) {
        let total: u64 = pattern.iter().sum();
        println!("[buzz {total}ms]");
    }
}

/// Bean inventory backed by the local database; refresh reloads the
/// bean list after the log store has decremented stock.
pub struct DbInventory<'a> {
    pub db: &'a Database,
    pub beans: Vec<Bean>,
}

impl<'a> DbInventory<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            beans: Vec::new(),
        }
    }
}

impl BeanInventory for DbInventory<'_> {
    fn refresh(&mut self) -> Result<(), CoreError> {
        self.beans = self.db.list_beans()?;
        Ok(())
    }
}
