//! The coach's mood and recent remarks.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::analysis::Analysis;
use crate::analysis::commentary::DECISIVE_SCORE;
use crate::analysis::move_quality::MoveQuality;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoachMood {
    #[default]
    Neutral,
    Encouraging,
    Analytical,
    Concerned,
    Impressed,
}

impl CoachMood {
    /// Mood after seeing a move of `quality` leading to `evaluation`.
    pub fn from_analysis(quality: MoveQuality, evaluation: f64) -> Self {
        match quality {
            MoveQuality::Brilliant | MoveQuality::Excellent => CoachMood::Impressed,
            MoveQuality::Mistake | MoveQuality::Blunder => CoachMood::Concerned,
            MoveQuality::Good | MoveQuality::Inaccurate if evaluation.abs() > DECISIVE_SCORE => {
                CoachMood::Analytical
            }
            MoveQuality::Good | MoveQuality::Inaccurate => CoachMood::Encouraging,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CoachMood::Neutral => "neutral",
            CoachMood::Encouraging => "encouraging",
            CoachMood::Analytical => "analytical",
            CoachMood::Concerned => "concerned",
            CoachMood::Impressed => "impressed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachComment {
    /// SAN of the move the remark is about.
    pub move_san: Option<String>,
    pub comment: String,
    pub mood: CoachMood,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachState {
    pub mood: CoachMood,
    pub last_comment: String,
    /// Most recent first.
    pub history: VecDeque<CoachComment>,
    pub history_limit: usize,
}

impl Default for CoachState {
    fn default() -> Self {
        Self::new(10)
    }
}

impl CoachState {
    pub fn new(history_limit: usize) -> Self {
        Self {
            mood: CoachMood::Neutral,
            last_comment: "New game! Show me what you can do.".to_owned(),
            history: VecDeque::with_capacity(history_limit),
            history_limit: history_limit.max(1),
        }
    }

    /// Take in a fresh analysis of the move `move_san`.
    pub fn observe(&mut self, analysis: &Analysis, move_san: Option<&str>) -> &CoachComment {
        self.mood = CoachMood::from_analysis(analysis.move_quality, analysis.evaluation);
        self.last_comment = analysis.commentary.clone();
        self.history.push_front(CoachComment {
            move_san: move_san.map(str::to_owned),
            comment: analysis.commentary.clone(),
            mood: self.mood,
            timestamp: Utc::now(),
        });
        self.history.truncate(self.history_limit);
        &self.history[0]
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.history_limit);
    }
}

#[cfg(test)]
mod tests {
    use super::{CoachMood, CoachState};
    use crate::analysis::analysis::Analysis;
    use crate::analysis::move_quality::MoveQuality;

    fn analysis(quality: MoveQuality, evaluation: f64, commentary: &str) -> Analysis {
        Analysis {
            fen: String::new(),
            evaluation,
            best_move: None,
            principal_variation: Vec::new(),
            depth: 15,
            commentary: commentary.to_owned(),
            move_quality: quality,
            threats: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    #[test]
    fn mood_mapping() {
        assert_eq!(CoachMood::from_analysis(MoveQuality::Brilliant, 5.0), CoachMood::Impressed);
        assert_eq!(CoachMood::from_analysis(MoveQuality::Excellent, 0.0), CoachMood::Impressed);
        assert_eq!(CoachMood::from_analysis(MoveQuality::Blunder, 9.0), CoachMood::Concerned);
        assert_eq!(CoachMood::from_analysis(MoveQuality::Mistake, 1.5), CoachMood::Concerned);
        assert_eq!(CoachMood::from_analysis(MoveQuality::Good, -2.5), CoachMood::Analytical);
        assert_eq!(CoachMood::from_analysis(MoveQuality::Inaccurate, 0.7), CoachMood::Encouraging);
        assert_eq!(CoachMood::default(), CoachMood::Neutral);
    }

    #[test]
    fn history_is_newest_first_and_capped() {
        let mut coach = CoachState::new(10);
        for i in 0..12 {
            coach.observe(&analysis(MoveQuality::Good, 0.3, &format!("line {i}")), Some("e4"));
        }
        assert_eq!(coach.history.len(), 10);
        assert_eq!(coach.history[0].comment, "line 11");
        assert_eq!(coach.history[9].comment, "line 2");
        assert_eq!(coach.last_comment, "line 11");
        assert_eq!(coach.mood, CoachMood::Encouraging);

        coach.reset();
        assert!(coach.history.is_empty());
        assert_eq!(coach.mood, CoachMood::Neutral);
    }

    #[test]
    fn serializes_mood_as_lowercase() {
        let json = serde_json::to_string(&CoachMood::Analytical).expect("json");
        assert_eq!(json, "\"analytical\"");
    }
}
