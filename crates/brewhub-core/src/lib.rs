//! # Brewhub Core Library
//!
//! Core business logic for Brewhub, a pour-over brewing companion. The
//! heart of the crate is the brewing session engine: a tick-driven timer
//! that walks an ordered pour-step schedule, alerts exactly once per
//! step transition, tracks cumulative poured water, and finalizes a
//! session into a persisted brew log. All operations are available via
//! the standalone `brewhub-cli` binary; a GUI would be a thin layer over
//! this same library.
//!
//! ## Architecture
//!
//! - **Session engine**: a state machine that requires the caller (or
//!   the provided [`Ticker`]) to invoke `tick()` periodically
//! - **Storage**: SQLite for recipes, beans, and brew logs; TOML for
//!   configuration
//! - **Collaborators**: the finalizer's log store and bean inventory are
//!   injected as traits, never reached as ambient globals
//!
//! ## Key Components
//!
//! - [`BrewSession`]: session state machine and finalizer
//! - [`Ticker`]: the one periodic tick source a live session may own
//! - [`AlertDispatcher`]: audio-plus-haptic step alerts with fallback
//! - [`Database`]: recipe/bean/brew-log persistence
//! - [`Config`]: application configuration

pub mod bean;
pub mod brew_log;
pub mod error;
pub mod events;
pub mod recipe;
pub mod session;
pub mod storage;

pub use bean::{Bean, RoastLevel};
pub use brew_log::{BrewLog, NewBrewLog, TasteAspect, TasteNote};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use recipe::{Equipment, GrindSize, Recipe};
pub use session::{
    active_step_index, AlertDispatcher, AlertSink, BeanInventory, BrewLogSink, BrewSession,
    Clock, PourStep, StepSchedule, Ticker, DEFAULT_RATING, TICK_QUANTUM_MS, VIBRATION_PATTERN,
};
pub use storage::{Config, Database};
