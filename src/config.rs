//! Coach configuration.
//!
//! Every tuning value of the evaluation and coaching layer lives here rather
//! than in code. All fields have defaults, so a JSON document only needs the
//! keys it wants to change.

use serde::{Deserialize, Serialize};

use crate::analysis::analysis_cache::DEFAULT_CACHE_CAPACITY;
use crate::analysis::commentary::CommentaryTemplates;
use crate::analysis::evaluator::EvaluatorConfig;
use crate::analysis::move_quality::QualityThresholds;
use crate::errors::ChessErrors;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    pub evaluator: EvaluatorConfig,
    pub quality_thresholds: QualityThresholds,
    /// Chance that an analysed move is relabelled brilliant.
    pub brilliant_probability: f64,
    pub cache_capacity: usize,
    /// Depth figure reported with each analysis.
    pub analysis_depth: u8,
    pub comment_history_len: usize,
    /// Chance the random opponent takes a capture when one exists.
    pub capture_preference: f64,
    pub commentary: CommentaryTemplates,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorConfig::default(),
            quality_thresholds: QualityThresholds::default(),
            brilliant_probability: 0.05,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            analysis_depth: 15,
            comment_history_len: 10,
            capture_preference: 0.7,
            commentary: CommentaryTemplates::default(),
        }
    }
}

impl CoachConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ChessErrors> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ChessErrors::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ChessErrors> {
        serde_json::to_string_pretty(self).map_err(|err| ChessErrors::InvalidConfig(err.to_string()))
    }

    pub fn validate(&self) -> Result<(), ChessErrors> {
        let evaluator = &self.evaluator;
        if !(evaluator.clamp.is_finite() && evaluator.clamp > 0.0) {
            return Err(invalid("evaluator.clamp must be positive"));
        }
        if !(0.0..=1.0).contains(&evaluator.opening_damping) {
            return Err(invalid("evaluator.opening_damping must be within [0, 1]"));
        }
        let values = &evaluator.piece_values;
        let weights = [values.pawn, values.knight, values.bishop, values.rook, values.queen, values.king];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid("piece values must be finite and non-negative"));
        }
        if !self.quality_thresholds.is_ascending() {
            return Err(invalid("quality thresholds must be positive and strictly ascending"));
        }
        for (name, p) in [
            ("brilliant_probability", self.brilliant_probability),
            ("capture_preference", self.capture_preference),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(&format!("{name} must be within [0, 1]")));
            }
        }
        if self.cache_capacity == 0 {
            return Err(invalid("cache_capacity must be at least 1"));
        }
        if self.comment_history_len == 0 {
            return Err(invalid("comment_history_len must be at least 1"));
        }
        if self.commentary.has_empty_category() {
            return Err(invalid("every commentary category needs at least one line"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ChessErrors {
    ChessErrors::InvalidConfig(reason.to_owned())
}

#[cfg(test)]
mod tests {
    use super::CoachConfig;
    use crate::errors::ChessErrors;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(CoachConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = CoachConfig::from_json_str(
            r#"{ "brilliant_probability": 0.0, "evaluator": { "opening_plies": 4 } }"#,
        )
        .expect("config should load");
        assert_eq!(config.brilliant_probability, 0.0);
        assert_eq!(config.evaluator.opening_plies, 4);
        assert_eq!(config.evaluator.clamp, 10.0);
        assert_eq!(config.cache_capacity, 4096);
    }

    #[test]
    fn json_round_trip() {
        let config = CoachConfig::default();
        let json = config.to_json_string().expect("serialize");
        assert_eq!(CoachConfig::from_json_str(&json).expect("parse"), config);
    }

    #[test]
    fn rejects_bad_values() {
        for json in [
            r#"{ "brilliant_probability": 1.5 }"#,
            r#"{ "quality_thresholds": { "good": 3.0 } }"#,
            r#"{ "cache_capacity": 0 }"#,
            r#"{ "commentary": { "good": [] } }"#,
            r#"{ "evaluator": { "clamp": -1.0 } }"#,
            "not json",
        ] {
            assert!(
                matches!(CoachConfig::from_json_str(json), Err(ChessErrors::InvalidConfig(_))),
                "expected {json} to be rejected"
            );
        }
    }
}
