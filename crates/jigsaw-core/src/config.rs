use crate::error::{PuzzleError, Result};
use crate::placement::{PlacementConfig, FEEDBACK_DISTANCE_DEFAULT, SNAP_DISTANCE_DEFAULT};
use crate::scoring::{
    ScoringPolicy, BASE_SCORE_DEFAULT, HINT_PENALTY_DEFAULT, MIN_SCORE_DEFAULT,
    TIME_PENALTY_PER_SECOND_DEFAULT,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Set explicitly by the embedding application
    Override,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Override => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for placement tolerances and scoring
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub snap_distance: ConfigValue<f64>,
    pub feedback_distance: ConfigValue<f64>,
    pub base_score: ConfigValue<f64>,
    pub time_penalty_per_second: ConfigValue<f64>,
    pub hint_penalty: ConfigValue<f64>,
    pub min_score: ConfigValue<f64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            snap_distance: ConfigValue::new(SNAP_DISTANCE_DEFAULT, ConfigSource::Default),
            feedback_distance: ConfigValue::new(FEEDBACK_DISTANCE_DEFAULT, ConfigSource::Default),
            base_score: ConfigValue::new(BASE_SCORE_DEFAULT, ConfigSource::Default),
            time_penalty_per_second: ConfigValue::new(
                TIME_PENALTY_PER_SECOND_DEFAULT,
                ConfigSource::Default,
            ),
            hint_penalty: ConfigValue::new(HINT_PENALTY_DEFAULT, ConfigSource::Default),
            min_score: ConfigValue::new(MIN_SCORE_DEFAULT, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| PuzzleError::InvalidConfig {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| PuzzleError::InvalidConfig {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        let placement = file_config.placement.unwrap_or_default();
        if let Some(snap) = placement.snap_distance {
            self.snap_distance.update(snap, ConfigSource::File);
        }
        if let Some(feedback) = placement.feedback_distance {
            self.feedback_distance.update(feedback, ConfigSource::File);
        }

        let scoring = file_config.scoring.unwrap_or_default();
        if let Some(base) = scoring.base_score {
            self.base_score.update(base, ConfigSource::File);
        }
        if let Some(penalty) = scoring.time_penalty_per_second {
            self.time_penalty_per_second.update(penalty, ConfigSource::File);
        }
        if let Some(penalty) = scoring.hint_penalty {
            self.hint_penalty.update(penalty, ConfigSource::File);
        }
        if let Some(min) = scoring.min_score {
            self.min_score.update(min, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from `JIGSAW_*` environment variables.
    ///
    /// Unparsable values are logged and skipped.
    pub fn load_from_env(mut self) -> Self {
        let vars: [(&str, &mut ConfigValue<f64>); 6] = [
            ("JIGSAW_SNAP_DISTANCE", &mut self.snap_distance),
            ("JIGSAW_FEEDBACK_DISTANCE", &mut self.feedback_distance),
            ("JIGSAW_BASE_SCORE", &mut self.base_score),
            ("JIGSAW_TIME_PENALTY", &mut self.time_penalty_per_second),
            ("JIGSAW_HINT_PENALTY", &mut self.hint_penalty),
            ("JIGSAW_MIN_SCORE", &mut self.min_score),
        ];
        for (name, slot) in vars {
            if let Ok(raw) = env::var(name) {
                match parse_number(name, &raw) {
                    Ok(value) => slot.update(value, ConfigSource::Environment),
                    Err(_) => tracing::warn!(
                        "Invalid {} value '{}': expected a finite non-negative number",
                        name,
                        raw
                    ),
                }
            }
        }
        self
    }

    /// Apply explicit overrides from the embedding application
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(snap) = overrides.snap_distance {
            self.snap_distance.update(snap, ConfigSource::Override);
        }
        if let Some(feedback) = overrides.feedback_distance {
            self.feedback_distance.update(feedback, ConfigSource::Override);
        }
        if let Some(base) = overrides.base_score {
            self.base_score.update(base, ConfigSource::Override);
        }
        if let Some(penalty) = overrides.time_penalty_per_second {
            self.time_penalty_per_second.update(penalty, ConfigSource::Override);
        }
        if let Some(penalty) = overrides.hint_penalty {
            self.hint_penalty.update(penalty, ConfigSource::Override);
        }
        if let Some(min) = overrides.min_score {
            self.min_score.update(min, ConfigSource::Override);
        }
    }

    /// Validated placement tolerances
    pub fn placement_config(&self) -> Result<PlacementConfig> {
        PlacementConfig::new(self.snap_distance.value, self.feedback_distance.value)
    }

    /// Validated scoring policy
    pub fn scoring_policy(&self) -> Result<ScoringPolicy> {
        let policy = ScoringPolicy {
            base_score: self.base_score.value,
            time_penalty_per_second: self.time_penalty_per_second.value,
            hint_penalty: self.hint_penalty.value,
            min_score: self.min_score.value,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let entries = [
            ("snap_distance", &self.snap_distance),
            ("feedback_distance", &self.feedback_distance),
            ("base_score", &self.base_score),
            ("time_penalty_per_second", &self.time_penalty_per_second),
            ("hint_penalty", &self.hint_penalty),
            ("min_score", &self.min_score),
        ];
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), (value.value.to_string(), value.source)))
            .collect()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Default, Deserialize, Serialize)]
struct FileConfig {
    placement: Option<PlacementSection>,
    scoring: Option<ScoringSection>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct PlacementSection {
    snap_distance: Option<f64>,
    feedback_distance: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct ScoringSection {
    base_score: Option<f64>,
    time_penalty_per_second: Option<f64>,
    hint_penalty: Option<f64>,
    min_score: Option<f64>,
}

/// Explicit configuration overrides
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub snap_distance: Option<f64>,
    pub feedback_distance: Option<f64>,
    pub base_score: Option<f64>,
    pub time_penalty_per_second: Option<f64>,
    pub hint_penalty: Option<f64>,
    pub min_score: Option<f64>,
}

/// Parse a finite, non-negative number
pub fn parse_number(key: &str, s: &str) -> Result<f64> {
    match s.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(PuzzleError::InvalidConfig {
            key: key.to_string(),
            reason: format!("Invalid number: {}", s),
        }),
    }
}
