//! Pluggable position scoring.
//!
//! Scores are in pawn units from white's point of view. The baseline scorer
//! counts material only, damps the result during the opening plies and clamps
//! it to a fixed window. Scoring is pure: the same board and ply always give
//! the same number.

use serde::{Deserialize, Serialize};

use crate::game_state::{chess_types::*, game_state::GameState};

pub trait PositionScorer: Send + Sync {
    /// White-positive score of `game_state` reached after `ply` half-moves.
    fn score(&self, game_state: &GameState, ply: usize) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceValues {
    pub pawn: f64,
    pub knight: f64,
    pub bishop: f64,
    pub rook: f64,
    pub queen: f64,
    pub king: f64,
}

impl Default for PieceValues {
    fn default() -> Self {
        Self {
            pawn: 1.0,
            knight: 3.0,
            bishop: 3.0,
            rook: 5.0,
            queen: 9.0,
            king: 0.0,
        }
    }
}

impl PieceValues {
    #[inline]
    pub fn value(&self, kind: PieceKind) -> f64 {
        match kind {
            PieceKind::Pawn => self.pawn,
            PieceKind::Knight => self.knight,
            PieceKind::Bishop => self.bishop,
            PieceKind::Rook => self.rook,
            PieceKind::Queen => self.queen,
            PieceKind::King => self.king,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub piece_values: PieceValues,
    /// Scores before this many plies are multiplied by `opening_damping`.
    pub opening_plies: usize,
    pub opening_damping: f64,
    /// Scores are clamped to `[-clamp, clamp]`.
    pub clamp: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            piece_values: PieceValues::default(),
            opening_plies: 10,
            opening_damping: 0.5,
            clamp: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEvaluator {
    config: EvaluatorConfig,
}

impl MaterialEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn material_balance_white_minus_black(&self, game_state: &GameState) -> f64 {
        PieceKind::ALL
            .iter()
            .map(|&kind| {
                let diff = f64::from(game_state.count(Color::Light, kind))
                    - f64::from(game_state.count(Color::Dark, kind));
                diff * self.config.piece_values.value(kind)
            })
            .sum()
    }
}

impl PositionScorer for MaterialEvaluator {
    fn score(&self, game_state: &GameState, ply: usize) -> f64 {
        let mut score = self.material_balance_white_minus_black(game_state);
        if ply < self.config.opening_plies {
            score *= self.config.opening_damping;
        }
        score.clamp(-self.config.clamp, self.config.clamp)
    }
}

#[cfg(test)]
mod tests {
    use super::{EvaluatorConfig, MaterialEvaluator, PositionScorer};
    use crate::game_state::game_state::GameState;

    #[test]
    fn starting_position_is_level() {
        let evaluator = MaterialEvaluator::default();
        assert_eq!(evaluator.score(&GameState::new_game(), 0), 0.0);
    }

    #[test]
    fn opening_plies_are_damped() {
        // White is a knight up.
        let game = GameState::from_fen("r1bqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("FEN should parse");
        let evaluator = MaterialEvaluator::default();
        assert_eq!(evaluator.score(&game, 9), 1.5);
        assert_eq!(evaluator.score(&game, 10), 3.0);
    }

    #[test]
    fn scores_are_clamped_and_signed_for_black() {
        let game = GameState::from_fen("qqqqkqqq/8/8/8/8/8/8/4K3 w - - 0 40").expect("FEN should parse");
        let evaluator = MaterialEvaluator::default();
        assert_eq!(evaluator.score(&game, 80), -10.0);
    }

    #[test]
    fn custom_weights_change_the_balance() {
        let mut config = EvaluatorConfig::default();
        config.piece_values.knight = 3.5;
        config.opening_plies = 0;
        let game = GameState::from_fen("4k3/8/8/8/8/8/8/1N2K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(MaterialEvaluator::new(config).score(&game, 0), 3.5);
    }
}
