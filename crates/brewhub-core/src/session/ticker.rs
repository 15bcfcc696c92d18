//! Periodic tick source.
//!
//! Exactly one tick task may be alive per session instance. `start` is
//! idempotent while the task runs, `stop` aborts it, and dropping the
//! ticker aborts it too - no tick or alert can be delivered after the
//! source is gone, so an in-flight alert cannot outlive a reset.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};

use super::clock::TICK_QUANTUM_MS;
use super::engine::BrewSession;
use crate::events::Event;

/// Drives a shared [`BrewSession`] on the tick quantum, forwarding any
/// produced events to the channel.
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_alive(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Spawn the tick loop. A second call while the task is alive is a
    /// no-op - never a second source.
    pub fn start(&mut self, session: Arc<Mutex<BrewSession>>, events: UnboundedSender<Event>) {
        if self.is_alive() {
            return;
        }
        let handle = tokio::spawn(async move {
            let period = Duration::from_millis(TICK_QUANTUM_MS);
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            // Missed ticks coalesce; the clock does not burst to catch up.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let event = match session.lock() {
                    Ok(mut session) => session.tick(),
                    Err(_) => break,
                };
                if let Some(event) = event {
                    if events.send(event).is_err() {
                        break;
                    }
                }
            }
        });
        self.handle = Some(handle);
    }

    /// Abort the tick task. Ticks stop immediately.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn running_session() -> Arc<Mutex<BrewSession>> {
        let mut session = BrewSession::new();
        session.start();
        Arc::new(Mutex::new(session))
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_accumulate_on_the_quantum() {
        let session = running_session();
        let (tx, _rx) = mpsc::unbounded_channel();

        let mut ticker = Ticker::new();
        ticker.start(session.clone(), tx);
        time::sleep(Duration::from_millis(550)).await;
        ticker.stop();

        assert_eq!(session.lock().unwrap().elapsed_ms(), 500);
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_does_not_double_tick() {
        let session = running_session();
        let (tx, _rx) = mpsc::unbounded_channel();

        let mut ticker = Ticker::new();
        ticker.start(session.clone(), tx.clone());
        ticker.start(session.clone(), tx);
        time::sleep(Duration::from_millis(550)).await;
        ticker.stop();

        assert_eq!(session.lock().unwrap().elapsed_ms(), 500);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_ticking() {
        let session = running_session();
        let (tx, _rx) = mpsc::unbounded_channel();

        let mut ticker = Ticker::new();
        ticker.start(session.clone(), tx);
        time::sleep(Duration::from_millis(250)).await;
        ticker.stop();
        let frozen = session.lock().unwrap().elapsed_ms();

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(session.lock().unwrap().elapsed_ms(), frozen);
        assert!(!ticker.is_alive());
    }
}
