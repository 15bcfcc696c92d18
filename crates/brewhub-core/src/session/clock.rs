//! Monotonic elapsed-time accumulator with start/pause/reset transport.

use serde::{Deserialize, Serialize};

/// Quantum the periodic tick source advances the clock by, in
/// milliseconds. The period is approximate; correctness depends only on
/// elapsed time never decreasing.
pub const TICK_QUANTUM_MS: u64 = 100;

/// Accumulates elapsed milliseconds while running. The clock has no
/// internal thread; a tick source calls [`Clock::advance`] periodically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clock {
    elapsed_ms: u64,
    running: bool,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin accumulating. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Stop accumulating, preserving elapsed time exactly. Returns false
    /// if already paused.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// Stop and zero the clock.
    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed_ms = 0;
    }

    /// Accumulate `delta_ms` if running. Returns whether time advanced.
    pub fn advance(&mut self, delta_ms: u64) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        true
    }

    /// Advance by one tick quantum.
    pub fn tick(&mut self) -> bool {
        self.advance(TICK_QUANTUM_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_pause_are_idempotent() {
        let mut clock = Clock::new();
        assert!(clock.start());
        assert!(!clock.start());
        assert!(clock.is_running());

        assert!(clock.pause());
        assert!(!clock.pause());
        assert!(!clock.is_running());
    }

    #[test]
    fn advance_only_accumulates_while_running() {
        let mut clock = Clock::new();
        assert!(!clock.advance(500));
        assert_eq!(clock.elapsed_ms(), 0);

        clock.start();
        assert!(clock.advance(500));
        assert_eq!(clock.elapsed_ms(), 500);

        clock.pause();
        clock.advance(500);
        assert_eq!(clock.elapsed_ms(), 500);
    }

    #[test]
    fn pause_preserves_elapsed_exactly() {
        let mut clock = Clock::new();
        clock.start();
        clock.advance(1234);
        clock.pause();
        assert_eq!(clock.elapsed_ms(), 1234);
        clock.start();
        clock.advance(100);
        assert_eq!(clock.elapsed_ms(), 1334);
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut clock = Clock::new();
        clock.start();
        clock.advance(60_000);
        clock.reset();
        assert_eq!(clock.elapsed_ms(), 0);
        assert!(!clock.is_running());
    }

    #[test]
    fn tick_advances_one_quantum() {
        let mut clock = Clock::new();
        clock.start();
        clock.tick();
        clock.tick();
        assert_eq!(clock.elapsed_ms(), 2 * TICK_QUANTUM_MS);
    }
}
