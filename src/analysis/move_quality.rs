//! Move-quality labels derived from the magnitude of an evaluation.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ordered from worst to best so labels compare naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveQuality {
    Blunder,
    Mistake,
    Inaccurate,
    Good,
    Excellent,
    Brilliant,
}

impl MoveQuality {
    pub const fn as_str(self) -> &'static str {
        match self {
            MoveQuality::Blunder => "blunder",
            MoveQuality::Mistake => "mistake",
            MoveQuality::Inaccurate => "inaccurate",
            MoveQuality::Good => "good",
            MoveQuality::Excellent => "excellent",
            MoveQuality::Brilliant => "brilliant",
        }
    }
}

impl fmt::Display for MoveQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper bounds (exclusive) on `|score|` for each label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    pub excellent: f64,
    pub good: f64,
    pub inaccurate: f64,
    pub mistake: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            excellent: 0.2,
            good: 0.5,
            inaccurate: 1.0,
            mistake: 2.0,
        }
    }
}

impl QualityThresholds {
    /// Label a score by its magnitude. Never returns `Brilliant`.
    pub fn classify(&self, score: f64) -> MoveQuality {
        let magnitude = score.abs();
        if magnitude < self.excellent {
            MoveQuality::Excellent
        } else if magnitude < self.good {
            MoveQuality::Good
        } else if magnitude < self.inaccurate {
            MoveQuality::Inaccurate
        } else if magnitude < self.mistake {
            MoveQuality::Mistake
        } else {
            MoveQuality::Blunder
        }
    }

    pub fn is_ascending(&self) -> bool {
        0.0 < self.excellent
            && self.excellent < self.good
            && self.good < self.inaccurate
            && self.inaccurate < self.mistake
    }
}

/// Occasionally relabel a move as brilliant. This is presentation flavor and
/// does not feed back into any score.
pub fn apply_brilliant_flavor<R: Rng + ?Sized>(
    base: MoveQuality,
    probability: f64,
    rng: &mut R,
) -> MoveQuality {
    if probability > 0.0 && rng.random_bool(probability.min(1.0)) {
        MoveQuality::Brilliant
    } else {
        base
    }
}
