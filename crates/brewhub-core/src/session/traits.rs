//! Boundary collaborators injected into the session finalizer.
//!
//! The finalizer receives these as call parameters rather than reaching
//! into app-wide stores, so `finish()` is unit-testable against mocks.

use crate::brew_log::{BrewLog, NewBrewLog};
use crate::error::CoreError;

/// Persists finished brew logs. The finalizer calls `create` at most
/// once per finish. Implemented by [`crate::storage::Database`].
pub trait BrewLogSink {
    fn create(&self, log: NewBrewLog) -> Result<BrewLog, CoreError>;
}

/// The bean inventory held by the UI layer. Refreshed after a successful
/// finish: ingesting a brew log decrements stock inside the log store,
/// so cached bean data goes stale.
pub trait BeanInventory {
    fn refresh(&mut self) -> Result<(), CoreError>;
}
