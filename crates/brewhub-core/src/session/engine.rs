//! Brewing session engine.
//!
//! The engine is a tick-driven state machine. It does not own a thread -
//! a tick source (see [`super::Ticker`]) or the caller invokes `tick()`
//! periodically while the clock runs.
//!
//! ## Lifecycle
//!
//! ```text
//! select_recipe -> start -> (pause | tick)* -> finish | reset
//! ```
//!
//! Each tick advances the clock, runs the step resolver against the
//! schedule, and diffs the result against the stored step index. A
//! changed index is a transition event; a transition into a step that
//! has not alerted before in this session yields [`Event::StepEntered`].

use std::collections::HashSet;

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::clock::{Clock, TICK_QUANTUM_MS};
use super::resolver::active_step_index;
use super::schedule::{PourStep, StepSchedule};
use super::traits::{BeanInventory, BrewLogSink};
use crate::bean::Bean;
use crate::brew_log::NewBrewLog;
use crate::events::Event;
use crate::recipe::Recipe;

/// Rating stamped on a freshly finished brew log unless overridden via
/// `[brew] default_rating` in config.
pub const DEFAULT_RATING: u8 = 3;

fn default_rating() -> u8 {
    DEFAULT_RATING
}

/// State for one brewing attempt: the selected recipe and bean, the
/// clock, and the transition bookkeeping. Mutated only by transport
/// commands, ticks, and `finish`; the UI layer just reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrewSession {
    recipe: Option<Recipe>,
    bean: Option<Bean>,
    schedule: StepSchedule,
    clock: Clock,
    current_step: usize,
    /// Step indices that already alerted this session. Survives clock
    /// jitter and re-entrant evaluation; cleared only by reset.
    fired_steps: HashSet<usize>,
    finishing: bool,
    #[serde(default = "default_rating")]
    default_rating: u8,
}

impl BrewSession {
    pub fn new() -> Self {
        Self {
            recipe: None,
            bean: None,
            schedule: StepSchedule::default(),
            clock: Clock::new(),
            current_step: 0,
            fired_steps: HashSet::new(),
            finishing: false,
            default_rating: DEFAULT_RATING,
        }
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Load a recipe and begin a fresh session over its schedule. The
    /// step list is sorted here, once, so the resolver's scan invariant
    /// holds without per-tick cost.
    pub fn select_recipe(&mut self, recipe: Recipe) {
        self.schedule = StepSchedule::new(recipe.steps.clone());
        self.recipe = Some(recipe);
        self.reset_state();
    }

    pub fn select_bean(&mut self, bean: Bean) {
        self.bean = Some(bean);
    }

    pub fn set_default_rating(&mut self, rating: u8) {
        self.default_rating = rating;
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn recipe(&self) -> Option<&Recipe> {
        self.recipe.as_ref()
    }

    pub fn bean(&self) -> Option<&Bean> {
        self.bean.as_ref()
    }

    pub fn schedule(&self) -> &StepSchedule {
        &self.schedule
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed_ms()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn is_finishing(&self) -> bool {
        self.finishing
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step
    }

    pub fn current_step(&self) -> Option<&PourStep> {
        self.schedule.get(self.current_step)
    }

    pub fn next_step(&self) -> Option<&PourStep> {
        self.schedule.get(self.current_step + 1)
    }

    /// Cumulative water poured through the active step, inclusive.
    pub fn poured_ml(&self) -> u32 {
        if self.schedule.is_empty() {
            return 0;
        }
        self.schedule.poured_ml(self.current_step)
    }

    /// Build a full state snapshot event for rendering.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            running: self.clock.is_running(),
            finishing: self.finishing,
            elapsed_ms: self.clock.elapsed_ms(),
            step_index: self.current_step,
            step_label: self
                .current_step()
                .map(|s| s.label.clone())
                .unwrap_or_default(),
            poured_ml: self.poured_ml(),
            total_water_ml: self
                .recipe
                .as_ref()
                .map(|r| r.total_water_ml)
                .unwrap_or_default(),
            at: Utc::now(),
        }
    }

    // ── Transport ────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if !self.clock.start() {
            return None; // Already running.
        }
        Some(Event::SessionStarted {
            elapsed_ms: self.clock.elapsed_ms(),
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.clock.pause() {
            return None; // Already paused.
        }
        Some(Event::SessionPaused {
            elapsed_ms: self.clock.elapsed_ms(),
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Event {
        self.reset_state();
        Event::SessionReset { at: Utc::now() }
    }

    fn reset_state(&mut self) {
        self.clock.reset();
        self.current_step = 0;
        self.fired_steps.clear();
    }

    // ── Ticking ──────────────────────────────────────────────────────

    /// Advance by one tick quantum. Call periodically while running.
    pub fn tick(&mut self) -> Option<Event> {
        self.advance(TICK_QUANTUM_MS)
    }

    /// Advance the clock by `delta_ms` and evaluate the step resolver.
    /// Returns `Some(Event::StepEntered)` on a transition into a step
    /// that has not alerted before; step 0 never alerts.
    pub fn advance(&mut self, delta_ms: u64) -> Option<Event> {
        if !self.clock.advance(delta_ms) {
            return None;
        }
        let index = active_step_index(self.clock.elapsed_ms(), self.schedule.steps())?;
        if index == self.current_step {
            return None;
        }
        debug!("step transition {} -> {}", self.current_step, index);
        self.current_step = index;
        if index > 0 && self.fired_steps.insert(index) {
            let step = self.schedule.get(index)?;
            return Some(Event::StepEntered {
                step_index: index,
                label: step.label.clone(),
                water_ml: step.water_ml,
                at: Utc::now(),
            });
        }
        None
    }

    // ── Finalization ─────────────────────────────────────────────────

    /// Finish the session: persist a brew log (best effort), refresh the
    /// bean inventory on success, and reset to a clean idle state.
    ///
    /// Returns `None` if a finish is already in flight. Otherwise always
    /// returns [`Event::SessionFinished`] - persistence failures are
    /// logged and absorbed, never allowed to block the reset. Without a
    /// selected recipe the call skips persistence entirely.
    pub fn finish(
        &mut self,
        logs: &dyn BrewLogSink,
        beans: &mut dyn BeanInventory,
    ) -> Option<Event> {
        if self.finishing {
            return None; // A finish is already in flight.
        }
        self.finishing = true;
        self.clock.pause();

        let elapsed_ms = self.clock.elapsed_ms();
        let recipe_id = self.recipe.as_ref().map(|r| r.id.clone());
        let mut logged = false;

        if let (Some(recipe), Some(bean)) = (self.recipe.as_ref(), self.bean.as_ref()) {
            let new = NewBrewLog {
                recipe_id: recipe.id.clone(),
                bean_id: Some(bean.id.clone()),
                actual_duration: elapsed_ms / 1000,
                rating: self.default_rating,
                taste_notes: Vec::new(),
                memo: String::new(),
            };
            match logs.create(new) {
                Ok(_) => {
                    logged = true;
                    // The store decremented bean stock when it ingested
                    // the log; cached inventory data is stale now.
                    if let Err(e) = beans.refresh() {
                        warn!("bean inventory refresh failed: {e}");
                    }
                }
                Err(e) => warn!("brew log write failed, finishing anyway: {e}"),
            }
        }

        self.reset_state();
        self.recipe = None;
        self.bean = None;
        self.finishing = false;

        Some(Event::SessionFinished {
            recipe_id,
            actual_duration_secs: elapsed_ms / 1000,
            logged,
            at: Utc::now(),
        })
    }
}

impl Default for BrewSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::brew_log::BrewLog;
    use crate::error::CoreError;

    fn recipe_with_steps() -> Recipe {
        let mut recipe = Recipe::new("Test V60", 15.0, 250);
        recipe.steps = vec![
            PourStep {
                order: 1,
                label: "Bloom".into(),
                time_seconds: 0,
                water_ml: 30,
                notes: None,
            },
            PourStep {
                order: 2,
                label: "Pour 1".into(),
                time_seconds: 30,
                water_ml: 70,
                notes: None,
            },
            PourStep {
                order: 3,
                label: "Pour 2".into(),
                time_seconds: 60,
                water_ml: 80,
                notes: None,
            },
        ];
        recipe
    }

    struct MockLogSink {
        created: RefCell<Vec<NewBrewLog>>,
        fail: bool,
    }

    impl MockLogSink {
        fn new() -> Self {
            Self {
                created: RefCell::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                created: RefCell::new(Vec::new()),
                fail: true,
            }
        }
    }

    impl BrewLogSink for MockLogSink {
        fn create(&self, log: NewBrewLog) -> Result<BrewLog, CoreError> {
            if self.fail {
                return Err(CoreError::Custom("store unavailable".into()));
            }
            self.created.borrow_mut().push(log.clone());
            Ok(BrewLog {
                id: "log-1".into(),
                recipe_id: log.recipe_id,
                bean_id: log.bean_id,
                brew_date: Utc::now(),
                actual_duration: log.actual_duration,
                rating: log.rating,
                taste_notes: log.taste_notes,
                memo: log.memo,
                created_at: Utc::now(),
            })
        }
    }

    struct MockInventory {
        refreshes: Cell<u32>,
    }

    impl MockInventory {
        fn new() -> Self {
            Self {
                refreshes: Cell::new(0),
            }
        }
    }

    impl BeanInventory for MockInventory {
        fn refresh(&mut self) -> Result<(), CoreError> {
            self.refreshes.set(self.refreshes.get() + 1);
            Ok(())
        }
    }

    fn started_session() -> BrewSession {
        let mut session = BrewSession::new();
        session.select_recipe(recipe_with_steps());
        session.select_bean(Bean::new("Test Bean", 200.0));
        session.start();
        session
    }

    #[test]
    fn entering_step_zero_never_alerts() {
        let mut session = started_session();
        assert_eq!(session.current_step_index(), 0);
        assert!(session.tick().is_none());
        assert_eq!(session.current_step_index(), 0);
    }

    #[test]
    fn transition_fires_exactly_once_per_step() {
        let mut session = started_session();
        let event = session.advance(30_000);
        match event {
            Some(Event::StepEntered { step_index, ref label, water_ml, .. }) => {
                assert_eq!(step_index, 1);
                assert_eq!(label, "Pour 1");
                assert_eq!(water_ml, 70);
            }
            other => panic!("expected StepEntered, got {other:?}"),
        }

        // Re-entrant evaluation at the same step: no second alert.
        assert!(session.advance(0).is_none());
        assert!(session.tick().is_none());
        assert_eq!(session.current_step_index(), 1);
    }

    #[test]
    fn pause_resume_does_not_refire() {
        let mut session = started_session();
        assert!(session.advance(30_000).is_some());
        session.pause();
        session.start();
        assert!(session.advance(0).is_none());
    }

    #[test]
    fn reset_clears_fired_steps_and_rearms_alerts() {
        let mut session = started_session();
        assert!(session.advance(30_000).is_some());
        session.reset();
        assert_eq!(session.elapsed_ms(), 0);
        assert_eq!(session.current_step_index(), 0);

        session.start();
        assert!(session.advance(30_000).is_some());
    }

    #[test]
    fn ticks_do_not_advance_while_paused() {
        let mut session = started_session();
        session.pause();
        assert!(session.tick().is_none());
        assert_eq!(session.elapsed_ms(), 0);
    }

    #[test]
    fn cumulative_pour_is_inclusive_of_active_step() {
        let mut session = started_session();
        assert_eq!(session.poured_ml(), 30);
        session.advance(30_000);
        assert_eq!(session.poured_ml(), 100);
        session.advance(30_000);
        assert_eq!(session.poured_ml(), 180);
    }

    #[test]
    fn finish_with_recipe_and_bean_writes_one_log_and_resets() {
        let mut session = started_session();
        session.advance(125_000);

        let sink = MockLogSink::new();
        let mut inventory = MockInventory::new();
        let event = session.finish(&sink, &mut inventory);

        let created = sink.created.borrow();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].actual_duration, 125);
        assert_eq!(created[0].rating, DEFAULT_RATING);
        assert!(created[0].taste_notes.is_empty());
        assert_eq!(inventory.refreshes.get(), 1);

        match event {
            Some(Event::SessionFinished { logged, actual_duration_secs, .. }) => {
                assert!(logged);
                assert_eq!(actual_duration_secs, 125);
            }
            other => panic!("expected SessionFinished, got {other:?}"),
        }

        assert_eq!(session.elapsed_ms(), 0);
        assert!(!session.is_running());
        assert_eq!(session.current_step_index(), 0);
        assert!(session.recipe().is_none());
        assert!(session.bean().is_none());
        assert!(!session.is_finishing());
    }

    #[test]
    fn finish_without_recipe_skips_persistence_but_resets() {
        let mut session = BrewSession::new();
        session.start();
        session.advance(10_000);

        let sink = MockLogSink::new();
        let mut inventory = MockInventory::new();
        let event = session.finish(&sink, &mut inventory);

        assert!(sink.created.borrow().is_empty());
        assert_eq!(inventory.refreshes.get(), 0);
        assert!(matches!(
            event,
            Some(Event::SessionFinished { logged: false, .. })
        ));
        assert_eq!(session.elapsed_ms(), 0);
    }

    #[test]
    fn double_finish_writes_exactly_one_log() {
        let mut session = started_session();
        session.advance(60_000);

        let sink = MockLogSink::new();
        let mut inventory = MockInventory::new();
        assert!(session.finish(&sink, &mut inventory).is_some());
        assert!(session.finish(&sink, &mut inventory).is_some()); // benign no-op: selections cleared
        assert_eq!(sink.created.borrow().len(), 1);
    }

    #[test]
    fn persistence_failure_still_resets_and_skips_refresh() {
        let mut session = started_session();
        session.advance(45_000);

        let sink = MockLogSink::failing();
        let mut inventory = MockInventory::new();
        let event = session.finish(&sink, &mut inventory);

        assert!(matches!(
            event,
            Some(Event::SessionFinished { logged: false, .. })
        ));
        assert_eq!(inventory.refreshes.get(), 0);
        assert_eq!(session.elapsed_ms(), 0);
        assert!(session.recipe().is_none());
    }

    #[test]
    fn unsorted_recipe_steps_are_sorted_at_selection() {
        let mut recipe = recipe_with_steps();
        recipe.steps.reverse();
        let mut session = BrewSession::new();
        session.select_recipe(recipe);
        session.start();

        assert_eq!(session.current_step().unwrap().label, "Bloom");
        session.advance(30_000);
        assert_eq!(session.current_step().unwrap().label, "Pour 1");
    }

    #[test]
    fn snapshot_reflects_session_state() {
        let mut session = started_session();
        session.advance(30_000);
        match session.snapshot() {
            Event::StateSnapshot {
                running,
                elapsed_ms,
                step_index,
                step_label,
                poured_ml,
                total_water_ml,
                ..
            } => {
                assert!(running);
                assert_eq!(elapsed_ms, 30_000);
                assert_eq!(step_index, 1);
                assert_eq!(step_label, "Pour 1");
                assert_eq!(poured_ml, 100);
                assert_eq!(total_water_ml, 250);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }
}
