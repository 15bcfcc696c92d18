//! Pure mapping from elapsed time to the active pour step.

use super::schedule::PourStep;

/// Resolve the active step for `elapsed_ms`.
///
/// The active step is the one with the largest `time_seconds` threshold
/// not exceeding the elapsed time; among steps sharing that threshold the
/// earliest index wins. The last step stays active indefinitely. Returns
/// `None` for an empty schedule or when elapsed time precedes the first
/// threshold (possible when the first step does not start at 0) -- the
/// caller keeps its previous index in that case.
pub fn active_step_index(elapsed_ms: u64, steps: &[PourStep]) -> Option<usize> {
    let mut active: Option<usize> = None;
    for (i, step) in steps.iter().enumerate() {
        let threshold_ms = u64::from(step.time_seconds) * 1000;
        if threshold_ms > elapsed_ms {
            continue;
        }
        match active {
            Some(best) if steps[best].time_seconds >= step.time_seconds => {}
            _ => active = Some(i),
        }
    }
    active
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(time_seconds: u32) -> PourStep {
        PourStep {
            order: time_seconds,
            label: format!("step@{time_seconds}"),
            time_seconds,
            water_ml: 0,
            notes: None,
        }
    }

    #[test]
    fn resolves_thresholds_in_milliseconds() {
        let steps = vec![step(0), step(30), step(60)];
        assert_eq!(active_step_index(0, &steps), Some(0));
        assert_eq!(active_step_index(29_999, &steps), Some(0));
        assert_eq!(active_step_index(30_000, &steps), Some(1));
        assert_eq!(active_step_index(59_999, &steps), Some(1));
        assert_eq!(active_step_index(60_000, &steps), Some(2));
    }

    #[test]
    fn last_step_stays_active_indefinitely() {
        let steps = vec![step(0), step(30), step(60)];
        assert_eq!(active_step_index(90_000, &steps), Some(2));
        assert_eq!(active_step_index(u64::MAX, &steps), Some(2));
    }

    #[test]
    fn earlier_index_wins_equal_thresholds() {
        let steps = vec![step(0), step(30), step(30), step(60)];
        assert_eq!(active_step_index(30_000, &steps), Some(1));
        assert_eq!(active_step_index(45_000, &steps), Some(1));
    }

    #[test]
    fn empty_schedule_has_no_active_step() {
        assert_eq!(active_step_index(10_000, &[]), None);
    }

    #[test]
    fn elapsed_before_first_threshold_is_unresolved() {
        let steps = vec![step(10), step(30)];
        assert_eq!(active_step_index(0, &steps), None);
        assert_eq!(active_step_index(9_999, &steps), None);
        assert_eq!(active_step_index(10_000, &steps), Some(0));
    }
}
