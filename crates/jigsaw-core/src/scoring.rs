//! Score policy for finished (or in-progress) sessions.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, Result};

pub const BASE_SCORE_DEFAULT: f64 = 1000.0;
pub const TIME_PENALTY_PER_SECOND_DEFAULT: f64 = 0.5;
pub const HINT_PENALTY_DEFAULT: f64 = 50.0;
pub const MIN_SCORE_DEFAULT: f64 = 0.0;

/// Linear score curve: a base score minus time and hint penalties,
/// clamped to `min_score..=base_score`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringPolicy {
    pub base_score: f64,
    pub time_penalty_per_second: f64,
    pub hint_penalty: f64,
    pub min_score: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_score: BASE_SCORE_DEFAULT,
            time_penalty_per_second: TIME_PENALTY_PER_SECOND_DEFAULT,
            hint_penalty: HINT_PENALTY_DEFAULT,
            min_score: MIN_SCORE_DEFAULT,
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("base_score", self.base_score),
            ("time_penalty_per_second", self.time_penalty_per_second),
            ("hint_penalty", self.hint_penalty),
            ("min_score", self.min_score),
        ];
        for (key, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(PuzzleError::InvalidConfig {
                    key: key.to_string(),
                    reason: format!("must be a finite non-negative number, got {}", value),
                });
            }
        }
        if self.min_score > self.base_score {
            return Err(PuzzleError::InvalidConfig {
                key: "min_score".to_string(),
                reason: format!("{} exceeds base_score {}", self.min_score, self.base_score),
            });
        }
        Ok(())
    }

    pub fn score(&self, elapsed: Duration, hints_used: u32) -> u32 {
        let seconds = elapsed.num_milliseconds().max(0) as f64 / 1000.0;
        let raw = self.base_score
            - seconds * self.time_penalty_per_second
            - f64::from(hints_used) * self.hint_penalty;
        raw.clamp(self.min_score, self.base_score).floor() as u32
    }
}
