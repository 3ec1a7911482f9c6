//! Templated coaching text.
//!
//! The template category is a pure function of the move quality; only the
//! line picked within a category draws on the caller's RNG. Threats and
//! suggestions are fully deterministic.

use rand::prelude::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::analysis::move_quality::MoveQuality;
use crate::game_state::game_state::GameState;
use crate::move_generation::move_generator::GeneratedMove;

/// Scores beyond this magnitude count as a decisive imbalance.
pub const DECISIVE_SCORE: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentaryTemplates {
    pub brilliant: Vec<String>,
    pub excellent: Vec<String>,
    pub good: Vec<String>,
    pub inaccurate: Vec<String>,
    pub mistake: Vec<String>,
    pub blunder: Vec<String>,
    pub king_in_check: String,
    pub captures_available: String,
    pub decisive_advantage: String,
    pub difficult_position: String,
    pub balanced_position: String,
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

impl Default for CommentaryTemplates {
    fn default() -> Self {
        Self {
            brilliant: lines(&[
                "Magnificent! That move is truly brilliant!",
                "Extraordinary! You found the strongest move on the board!",
                "What a find! That combination is remarkable!",
            ]),
            excellent: lines(&[
                "Excellent choice! You have the position well in hand.",
                "Very well played! That move strengthens your game.",
                "Perfect! You are following sound strategic principles.",
            ]),
            good: lines(&[
                "Good move! You are heading in the right direction.",
                "Solid! That approach is perfectly reasonable.",
                "Well seen! Your pieces are developing harmoniously.",
            ]),
            inaccurate: lines(&[
                "Hmm, not the most precise move. There was something better.",
                "Careful! You let a better opportunity slip by.",
                "That works, but there was a stronger continuation.",
            ]),
            mistake: lines(&[
                "Ouch! That move gives away your advantage.",
                "A tactical slip! Your opponent can now counter-attack.",
                "Pity! You had been playing well up to here.",
            ]),
            blunder: lines(&[
                "Oh no! That error is very costly!",
                "Disaster! That move changes the whole evaluation.",
                "Watch out! That was a serious mistake!",
            ]),
            king_in_check: "Your king is in check!".to_owned(),
            captures_available: "Watch out for possible captures!".to_owned(),
            decisive_advantage: "You have a decisive advantage! Convert it.".to_owned(),
            difficult_position: "A difficult position. Look for complications.".to_owned(),
            balanced_position: "A balanced position. Develop your pieces harmoniously.".to_owned(),
        }
    }
}

impl CommentaryTemplates {
    /// Template lines for a quality label.
    pub fn category(&self, quality: MoveQuality) -> &[String] {
        match quality {
            MoveQuality::Brilliant => &self.brilliant,
            MoveQuality::Excellent => &self.excellent,
            MoveQuality::Good => &self.good,
            MoveQuality::Inaccurate => &self.inaccurate,
            MoveQuality::Mistake => &self.mistake,
            MoveQuality::Blunder => &self.blunder,
        }
    }

    /// Pick one line of the quality's category. An empty category yields an
    /// empty string.
    pub fn commentary<R: Rng + ?Sized>(&self, quality: MoveQuality, rng: &mut R) -> String {
        self.category(quality)
            .choose(rng)
            .cloned()
            .unwrap_or_default()
    }

    /// Warnings about the side to move's immediate situation.
    pub fn threats(&self, game_state: &GameState, legal_moves: &[GeneratedMove]) -> Vec<String> {
        let mut threats = Vec::new();
        if game_state.in_check() {
            threats.push(self.king_in_check.clone());
        }
        if legal_moves.iter().any(|generated| generated.mv.is_capture()) {
            threats.push(self.captures_available.clone());
        }
        threats
    }

    pub fn suggestions(&self, evaluation: f64) -> Vec<String> {
        let line = if evaluation.abs() > DECISIVE_SCORE {
            if evaluation > 0.0 {
                &self.decisive_advantage
            } else {
                &self.difficult_position
            }
        } else {
            &self.balanced_position
        };
        vec![line.clone()]
    }

    pub fn has_empty_category(&self) -> bool {
        [
            &self.brilliant,
            &self.excellent,
            &self.good,
            &self.inaccurate,
            &self.mistake,
            &self.blunder,
        ]
        .iter()
        .any(|category| category.is_empty())
    }
}
