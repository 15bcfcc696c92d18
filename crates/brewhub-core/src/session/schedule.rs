//! Pour step schedule.

use serde::{Deserialize, Serialize};

/// One discrete water-addition action in a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PourStep {
    /// Display order as authored in the recipe editor.
    pub order: u32,
    /// Short name of the pour action, e.g. "Bloom" or "Pour 1".
    pub label: String,
    /// Elapsed-time threshold at which this step becomes active.
    pub time_seconds: u32,
    /// Water poured during this step. Incremental, not cumulative.
    pub water_ml: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Immutable, time-ordered pour steps for one brewing session.
///
/// Built from a recipe's steps at session start. The step resolver's
/// scan requires non-decreasing `time_seconds`, which recipe editing
/// does not enforce, so construction sorts once here. The sort is
/// stable: steps sharing a threshold keep their authored order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepSchedule {
    steps: Vec<PourStep>,
}

impl StepSchedule {
    pub fn new(mut steps: Vec<PourStep>) -> Self {
        steps.sort_by_key(|s| s.time_seconds);
        Self { steps }
    }

    pub fn steps(&self) -> &[PourStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PourStep> {
        self.steps.get(index)
    }

    /// Cumulative water poured through `index`, inclusive.
    pub fn poured_ml(&self, index: usize) -> u32 {
        self.steps
            .iter()
            .take(index + 1)
            .map(|s| s.water_ml)
            .sum()
    }

    pub fn total_ml(&self) -> u32 {
        self.steps.iter().map(|s| s.water_ml).sum()
    }
}
