use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every observable state change in a brewing session produces an Event.
/// The CLI prints them; a GUI layer would poll or subscribe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    /// The step resolver advanced into a new pour step that has not
    /// alerted before in this session.
    StepEntered {
        step_index: usize,
        label: String,
        water_ml: u32,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    /// Finalization completed; doubles as the completion signal the UI
    /// layer navigates away on. `logged` is false when persistence was
    /// skipped (no recipe/bean) or failed.
    SessionFinished {
        recipe_id: Option<String>,
        actual_duration_secs: u64,
        logged: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        running: bool,
        finishing: bool,
        elapsed_ms: u64,
        step_index: usize,
        step_label: String,
        poured_ml: u32,
        total_water_ml: u32,
        at: DateTime<Utc>,
    },
}
