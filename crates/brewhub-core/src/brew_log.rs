//! Brew log data model.
//!
//! A brew log is the persisted record of one completed session. The
//! session finalizer creates it with defaulted evaluation fields; rating
//! and memo are editable afterwards through the log store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Highest rating / taste score the evaluation scale allows.
pub const MAX_SCORE: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TasteAspect {
    Acidity,
    Bitterness,
    Sweetness,
    Body,
    Aftertaste,
}

/// One scored taste dimension on a brew log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasteNote {
    pub aspect: TasteAspect,
    pub score: u8,
}

impl TasteNote {
    /// Build a taste note, rejecting scores above [`MAX_SCORE`].
    pub fn new(aspect: TasteAspect, score: u8) -> Result<Self, ValidationError> {
        if score > MAX_SCORE {
            return Err(ValidationError::InvalidValue {
                field: "score".to_string(),
                message: format!("must be 0..={MAX_SCORE}, got {score}"),
            });
        }
        Ok(Self { aspect, score })
    }
}

/// Persisted record of one brewing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrewLog {
    pub id: String,
    pub recipe_id: String,
    pub bean_id: Option<String>,
    pub brew_date: DateTime<Utc>,
    /// Measured session length in whole seconds.
    pub actual_duration: u64,
    pub rating: u8,
    #[serde(default)]
    pub taste_notes: Vec<TasteNote>,
    #[serde(default)]
    pub memo: String,
    pub created_at: DateTime<Utc>,
}

/// Create-request shape handed to the brew-log store. The store assigns
/// id and timestamps when it ingests the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBrewLog {
    pub recipe_id: String,
    pub bean_id: Option<String>,
    pub actual_duration: u64,
    pub rating: u8,
    #[serde(default)]
    pub taste_notes: Vec<TasteNote>,
    #[serde(default)]
    pub memo: String,
}
