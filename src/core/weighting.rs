use config::ConfigError;
use serde::{Deserialize, Serialize};

use crate::models::{Category, Importance, PreferenceSet};

/// The single importance-to-multiplier table
///
/// Deal-breakers never reach this table: the constraint filter removes
/// violating candidates upstream, and a satisfied deal-breaker weighs in
/// like an unstated dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImportanceWeights {
    #[serde(default = "default_important")]
    pub important: f64,
    #[serde(default = "default_not_important")]
    pub not_important: f64,
    #[serde(default = "default_neutral")]
    pub neutral: f64,
}

impl Default for ImportanceWeights {
    fn default() -> Self {
        Self {
            important: default_important(),
            not_important: default_not_important(),
            neutral: default_neutral(),
        }
    }
}

fn default_important() -> f64 { 2.0 }
fn default_not_important() -> f64 { 0.5 }
fn default_neutral() -> f64 { 1.0 }

impl ImportanceWeights {
    /// Multiplier for a stated (or unstated) importance level
    #[inline]
    pub fn weight(&self, importance: Option<Importance>) -> f64 {
        match importance {
            Some(Importance::Important) => self.important,
            Some(Importance::NotImportant) => self.not_important,
            Some(Importance::DealBreaker) | None => self.neutral,
        }
    }

    /// Every multiplier must be strictly positive so the weight sum never vanishes
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("important", self.important),
            ("not_important", self.not_important),
            ("neutral", self.neutral),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::Message(format!(
                    "scoring.importance.{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Per-category multipliers for one acting user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub budget: f64,
    pub location: f64,
    pub lifestyle: f64,
    pub schedule: f64,
    pub interests: f64,
    pub cleanliness: f64,
}

impl CategoryWeights {
    pub fn uniform(weight: f64) -> Self {
        Self {
            budget: weight,
            location: weight,
            lifestyle: weight,
            schedule: weight,
            interests: weight,
            cleanliness: weight,
        }
    }

    /// Derive category weights from stated importances
    ///
    /// A category fed by several dimensions takes the largest multiplier among
    /// the ones the user stated; a category with none stated stays neutral.
    pub fn from_preferences(preferences: &PreferenceSet, table: &ImportanceWeights) -> Self {
        let mut weights = Self::uniform(table.neutral);

        for category in Category::ALL {
            let stated = preferences
                .entries
                .iter()
                .filter(|(dimension, _)| dimension.category() == Some(category))
                .map(|(_, entry)| table.weight(Some(entry.importance)))
                .reduce(f64::max);

            if let Some(weight) = stated {
                weights.set(category, weight);
            }
        }

        weights
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Budget => self.budget,
            Category::Location => self.location,
            Category::Lifestyle => self.lifestyle,
            Category::Schedule => self.schedule,
            Category::Interests => self.interests,
            Category::Cleanliness => self.cleanliness,
        }
    }

    fn set(&mut self, category: Category, weight: f64) {
        match category {
            Category::Budget => self.budget = weight,
            Category::Location => self.location = weight,
            Category::Lifestyle => self.lifestyle = weight,
            Category::Schedule => self.schedule = weight,
            Category::Interests => self.interests = weight,
            Category::Cleanliness => self.cleanliness = weight,
        }
    }

    pub fn sum(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }
}
