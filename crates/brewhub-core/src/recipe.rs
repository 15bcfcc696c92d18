//! Recipe data model.
//!
//! Recipes are read-only to the session engine. Field names serialize in
//! camelCase, matching the JSON contract of the backend API; enums use
//! the API's SCREAMING_SNAKE_CASE variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::PourStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Equipment {
    V60,
    KalitaWave,
    Chemex,
    Aeropress,
    FrenchPress,
    Clever,
    Other,
}

impl Equipment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Equipment::V60 => "V60",
            Equipment::KalitaWave => "KALITA_WAVE",
            Equipment::Chemex => "CHEMEX",
            Equipment::Aeropress => "AEROPRESS",
            Equipment::FrenchPress => "FRENCH_PRESS",
            Equipment::Clever => "CLEVER",
            Equipment::Other => "OTHER",
        }
    }

    /// Parse the API string form; unknown values map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "V60" => Equipment::V60,
            "KALITA_WAVE" => Equipment::KalitaWave,
            "CHEMEX" => Equipment::Chemex,
            "AEROPRESS" => Equipment::Aeropress,
            "FRENCH_PRESS" => Equipment::FrenchPress,
            "CLEVER" => Equipment::Clever,
            _ => Equipment::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrindSize {
    ExtraFine,
    Fine,
    MediumFine,
    Medium,
    MediumCoarse,
    Coarse,
}

impl GrindSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrindSize::ExtraFine => "EXTRA_FINE",
            GrindSize::Fine => "FINE",
            GrindSize::MediumFine => "MEDIUM_FINE",
            GrindSize::Medium => "MEDIUM",
            GrindSize::MediumCoarse => "MEDIUM_COARSE",
            GrindSize::Coarse => "COARSE",
        }
    }

    /// Parse the API string form; unknown values map to `Medium`.
    pub fn parse(s: &str) -> Self {
        match s {
            "EXTRA_FINE" => GrindSize::ExtraFine,
            "FINE" => GrindSize::Fine,
            "MEDIUM_FINE" => GrindSize::MediumFine,
            "MEDIUM_COARSE" => GrindSize::MediumCoarse,
            "COARSE" => GrindSize::Coarse,
            _ => GrindSize::Medium,
        }
    }
}

/// A pour-over recipe with its ordered step schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default = "default_equipment")]
    pub equipment: Equipment,
    pub coffee_grams: f64,
    pub total_water_ml: u32,
    pub water_temperature: f64,
    #[serde(default = "default_grind")]
    pub grind_size: GrindSize,
    #[serde(default)]
    pub steps: Vec<PourStep>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_equipment() -> Equipment {
    Equipment::V60
}

fn default_grind() -> GrindSize {
    GrindSize::Medium
}

impl Recipe {
    /// Create a recipe with a fresh id and timestamps.
    pub fn new(title: impl Into<String>, coffee_grams: f64, total_water_ml: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            equipment: Equipment::V60,
            coffee_grams,
            total_water_ml,
            water_temperature: 92.0,
            grind_size: GrindSize::Medium,
            steps: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Ensure the recipe carries an id, assigning one if missing.
    /// Recipes deserialized from user-authored JSON may omit it.
    pub fn ensure_id(&mut self) {
        if self.id.is_empty() {
            self.id = Uuid::new_v4().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_string_forms_round_trip() {
        for eq in [
            Equipment::V60,
            Equipment::KalitaWave,
            Equipment::Chemex,
            Equipment::Aeropress,
            Equipment::FrenchPress,
            Equipment::Clever,
            Equipment::Other,
        ] {
            assert_eq!(Equipment::parse(eq.as_str()), eq);
        }
        for g in [
            GrindSize::ExtraFine,
            GrindSize::Fine,
            GrindSize::MediumFine,
            GrindSize::Medium,
            GrindSize::MediumCoarse,
            GrindSize::Coarse,
        ] {
            assert_eq!(GrindSize::parse(g.as_str()), g);
        }
    }

    #[test]
    fn recipe_json_uses_camel_case() {
        let recipe = Recipe::new("Morning V60", 15.0, 250);
        let json = serde_json::to_value(&recipe).unwrap();
        assert!(json.get("coffeeGrams").is_some());
        assert!(json.get("totalWaterMl").is_some());
        assert_eq!(json["equipment"], "V60");
    }

    #[test]
    fn ensure_id_assigns_when_missing() {
        let mut recipe: Recipe = serde_json::from_str(
            r#"{"title":"t","coffeeGrams":12,"totalWaterMl":200,"waterTemperature":90}"#,
        )
        .unwrap();
        assert!(recipe.id.is_empty());
        recipe.ensure_id();
        assert!(!recipe.id.is_empty());
    }
}
