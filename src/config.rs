use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::weighting::ImportanceWeights;

/// Engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub normalization: NormalizationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Truncate ranked results to this many entries
    #[serde(default)]
    pub max_results: Option<usize>,
    /// Drop results whose overall score falls below this floor
    #[serde(default)]
    pub min_score: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_results: None,
            min_score: 0.0,
        }
    }
}

/// Tunable curve parameters for the category scorers
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub importance: ImportanceWeights,
    #[serde(default = "default_region_credit")]
    pub region_credit: f64,
    #[serde(default = "default_nearby_radius_km")]
    pub nearby_radius_km: f64,
    #[serde(default = "default_schedule_adjacent_credit")]
    pub schedule_adjacent_credit: f64,
    #[serde(default = "default_neutral_sub_score")]
    pub neutral_sub_score: f64,
    #[serde(default = "default_listing_budget_tolerance")]
    pub listing_budget_tolerance: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            importance: ImportanceWeights::default(),
            region_credit: default_region_credit(),
            nearby_radius_km: default_nearby_radius_km(),
            schedule_adjacent_credit: default_schedule_adjacent_credit(),
            neutral_sub_score: default_neutral_sub_score(),
            listing_budget_tolerance: default_listing_budget_tolerance(),
        }
    }
}

fn default_region_credit() -> f64 { 10.0 }
fn default_nearby_radius_km() -> f64 { 10.0 }
fn default_schedule_adjacent_credit() -> f64 { 10.0 }
fn default_neutral_sub_score() -> f64 { 10.0 }
fn default_listing_budget_tolerance() -> f64 { 0.10 }

/// Values substituted for absent profile fields
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NormalizationSettings {
    #[serde(default = "default_budget_min")]
    pub default_budget_min: f64,
    #[serde(default = "default_budget_max")]
    pub default_budget_max: f64,
    #[serde(default = "default_cleanliness")]
    pub default_cleanliness: u8,
}

impl Default for NormalizationSettings {
    fn default() -> Self {
        Self {
            default_budget_min: default_budget_min(),
            default_budget_max: default_budget_max(),
            default_cleanliness: default_cleanliness(),
        }
    }
}

fn default_budget_min() -> f64 { 0.0 }
fn default_budget_max() -> f64 { 10_000.0 }
fn default_cleanliness() -> u8 { 3 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ROOMIE_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ROOMIE__SCORING__REGION_CREDIT -> scoring.region_credit
            .add_source(
                Environment::with_prefix("ROOMIE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ROOMIE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would break scoring invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.importance.validate()?;

        let scoring = &self.scoring;
        for (name, value) in [
            ("scoring.region_credit", scoring.region_credit),
            ("scoring.schedule_adjacent_credit", scoring.schedule_adjacent_credit),
            ("scoring.neutral_sub_score", scoring.neutral_sub_score),
        ] {
            if !(0.0..=20.0).contains(&value) {
                return Err(ConfigError::Message(format!(
                    "{name} must be within [0, 20], got {value}"
                )));
            }
        }
        if !(scoring.nearby_radius_km >= 0.0) {
            return Err(ConfigError::Message(
                "scoring.nearby_radius_km must not be negative".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&scoring.listing_budget_tolerance) {
            return Err(ConfigError::Message(
                "scoring.listing_budget_tolerance must be within [0, 1)".to_string(),
            ));
        }

        let normalization = &self.normalization;
        if normalization.default_budget_min < 0.0
            || normalization.default_budget_min > normalization.default_budget_max
        {
            return Err(ConfigError::Message(
                "normalization default budget range is invalid".to_string(),
            ));
        }
        if !(1..=5).contains(&normalization.default_cleanliness) {
            return Err(ConfigError::Message(
                "normalization.default_cleanliness must be a tier between 1 and 5".to_string(),
            ));
        }

        if !(0.0..=100.0).contains(&self.matching.min_score) {
            return Err(ConfigError::Message(
                "matching.min_score must be within [0, 100]".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring() {
        let scoring = ScoringSettings::default();
        assert_eq!(scoring.region_credit, 10.0);
        assert_eq!(scoring.schedule_adjacent_credit, 10.0);
        assert_eq!(scoring.neutral_sub_score, 10.0);
        assert_eq!(scoring.listing_budget_tolerance, 0.10);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_multiplier() {
        let mut settings = Settings::default();
        settings.scoring.importance.not_important = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_default_budget() {
        let mut settings = Settings::default();
        settings.normalization.default_budget_min = 5000.0;
        settings.normalization.default_budget_max = 100.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_config_deserializes_to_defaults() {
        let settings: Settings = Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.matching.min_score, 0.0);
        assert_eq!(settings.scoring.importance.important, 2.0);
        assert_eq!(settings.normalization.default_cleanliness, 3);
    }
}
