//! Coffee bean data model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoastLevel {
    Light,
    MediumLight,
    Medium,
    MediumDark,
    Dark,
}

impl RoastLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoastLevel::Light => "LIGHT",
            RoastLevel::MediumLight => "MEDIUM_LIGHT",
            RoastLevel::Medium => "MEDIUM",
            RoastLevel::MediumDark => "MEDIUM_DARK",
            RoastLevel::Dark => "DARK",
        }
    }

    /// Parse the API string form; unknown values map to `Medium`.
    pub fn parse(s: &str) -> Self {
        match s {
            "LIGHT" => RoastLevel::Light,
            "MEDIUM_LIGHT" => RoastLevel::MediumLight,
            "MEDIUM_DARK" => RoastLevel::MediumDark,
            "DARK" => RoastLevel::Dark,
            _ => RoastLevel::Medium,
        }
    }
}

/// A bag of beans in the user's inventory. `stock_grams` is decremented
/// by the brew-log store when a finished brew is ingested, never by the
/// session engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bean {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub roaster_name: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default = "default_roast")]
    pub roast_level: RoastLevel,
    #[serde(default)]
    pub process: String,
    #[serde(default)]
    pub roast_date: Option<NaiveDate>,
    #[serde(default)]
    pub stock_grams: f64,
    #[serde(default)]
    pub flavor_notes: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_roast() -> RoastLevel {
    RoastLevel::Medium
}

impl Bean {
    /// Create a bean with a fresh id and timestamps.
    pub fn new(name: impl Into<String>, stock_grams: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            roaster_name: String::new(),
            origin: String::new(),
            roast_level: RoastLevel::Medium,
            process: String::new(),
            roast_date: None,
            stock_grams,
            flavor_notes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
