//! Step-transition notification side effects.

use log::warn;

use crate::storage::NotificationsConfig;

/// Leading delay then short-short double buzz, in milliseconds.
pub const VIBRATION_PATTERN: [u64; 4] = [0, 200, 100, 200];

/// Notification channel capability. Audio and haptic are two independent
/// operations; failure of one must not gate the other.
pub trait AlertSink {
    /// Play the short alert cue.
    fn play_cue(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Trigger a vibration pattern (alternating delay/vibrate durations).
    fn vibrate(&mut self, pattern: &[u64]);
}

/// Performs the one-shot step alert: audio cue plus haptic buzz.
///
/// A failed cue is logged and never interrupts timer operation. The
/// haptic buzz runs regardless; when the cue fails it runs even with
/// vibration disabled in config, so the alert never silently no-ops.
#[derive(Debug, Clone)]
pub struct AlertDispatcher {
    config: NotificationsConfig,
}

impl AlertDispatcher {
    pub fn new(config: NotificationsConfig) -> Self {
        Self { config }
    }

    pub fn dispatch(&self, sink: &mut dyn AlertSink) {
        if !self.config.enabled {
            return;
        }
        let cue_ok = match sink.play_cue() {
            Ok(()) => true,
            Err(e) => {
                warn!("alert cue failed: {e}");
                false
            }
        };
        if self.config.vibration || !cue_ok {
            sink.vibrate(&VIBRATION_PATTERN);
        }
    }
}

impl Default for AlertDispatcher {
    fn default() -> Self {
        Self::new(NotificationsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingSink {
        cue_result: Result<(), &'static str>,
        cues: u32,
        buzzes: u32,
    }

    impl RecordingSink {
        fn new(cue_result: Result<(), &'static str>) -> Self {
            Self {
                cue_result,
                cues: 0,
                buzzes: 0,
            }
        }
    }

    impl AlertSink for RecordingSink {
        fn play_cue(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.cues += 1;
            self.cue_result.map_err(Into::into)
        }

        fn vibrate(&mut self, pattern: &[u64]) {
            assert_eq!(pattern, &VIBRATION_PATTERN[..]);
            self.buzzes += 1;
        }
    }

    #[test]
    fn dispatch_plays_cue_and_buzzes() {
        let dispatcher = AlertDispatcher::default();
        let mut sink = RecordingSink::new(Ok(()));
        dispatcher.dispatch(&mut sink);
        assert_eq!(sink.cues, 1);
        assert_eq!(sink.buzzes, 1);
    }

    #[test]
    fn cue_failure_still_buzzes() {
        let dispatcher = AlertDispatcher::default();
        let mut sink = RecordingSink::new(Err("no audio device"));
        dispatcher.dispatch(&mut sink);
        assert_eq!(sink.buzzes, 1);
    }

    #[test]
    fn cue_failure_overrides_disabled_vibration() {
        let config = NotificationsConfig {
            vibration: false,
            ..NotificationsConfig::default()
        };
        let dispatcher = AlertDispatcher::new(config);
        let mut sink = RecordingSink::new(Err("no audio device"));
        dispatcher.dispatch(&mut sink);
        assert_eq!(sink.buzzes, 1);
    }

    #[test]
    fn disabled_vibration_skips_buzz_when_cue_plays() {
        let config = NotificationsConfig {
            vibration: false,
            ..NotificationsConfig::default()
        };
        let dispatcher = AlertDispatcher::new(config);
        let mut sink = RecordingSink::new(Ok(()));
        dispatcher.dispatch(&mut sink);
        assert_eq!(sink.cues, 1);
        assert_eq!(sink.buzzes, 0);
    }

    #[test]
    fn disabled_notifications_do_nothing() {
        let config = NotificationsConfig {
            enabled: false,
            ..NotificationsConfig::default()
        };
        let dispatcher = AlertDispatcher::new(config);
        let mut sink = RecordingSink::new(Ok(()));
        dispatcher.dispatch(&mut sink);
        assert_eq!(sink.cues, 0);
        assert_eq!(sink.buzzes, 0);
    }
}
