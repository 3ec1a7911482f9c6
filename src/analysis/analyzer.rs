//! Builds an `Analysis` for one position.
//!
//! The numeric score and its quality label come from the configured scorer
//! and thresholds alone. The RNG handed in is used only for the commentary
//! line and the occasional brilliant relabel.

use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::analysis::analysis::Analysis;
use crate::analysis::commentary::CommentaryTemplates;
use crate::analysis::evaluator::{MaterialEvaluator, PieceValues, PositionScorer};
use crate::analysis::move_quality::{apply_brilliant_flavor, QualityThresholds};
use crate::config::CoachConfig;
use crate::errors::ChessErrors;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};
use crate::utils::san::move_to_san;

#[derive(Clone)]
pub struct Analyzer {
    scorer: Arc<dyn PositionScorer>,
    piece_values: PieceValues,
    thresholds: QualityThresholds,
    templates: Arc<CommentaryTemplates>,
    brilliant_probability: f64,
    depth: u8,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("thresholds", &self.thresholds)
            .field("brilliant_probability", &self.brilliant_probability)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::from_config(&CoachConfig::default())
    }
}

impl Analyzer {
    pub fn from_config(config: &CoachConfig) -> Self {
        Self {
            scorer: Arc::new(MaterialEvaluator::new(config.evaluator)),
            piece_values: config.evaluator.piece_values,
            thresholds: config.quality_thresholds,
            templates: Arc::new(config.commentary.clone()),
            brilliant_probability: config.brilliant_probability,
            depth: config.analysis_depth,
        }
    }

    /// Swap in a different scorer, keeping everything else.
    pub fn with_scorer(mut self, scorer: Arc<dyn PositionScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    #[inline]
    pub fn score(&self, game_state: &GameState, ply: usize) -> f64 {
        self.scorer.score(game_state, ply)
    }

    pub fn analyze<R: Rng + ?Sized>(
        &self,
        game_state: &GameState,
        ply: usize,
        rng: &mut R,
    ) -> Result<Analysis, ChessErrors> {
        let legal_moves = LegalMoveGenerator.generate_legal_moves(game_state)?;
        let evaluation = self.scorer.score(game_state, ply);

        let best_move = match self.best_move(&legal_moves) {
            Some(best) => Some(move_to_san(best, &legal_moves)?),
            None => None,
        };

        let base_quality = self.thresholds.classify(evaluation);
        let move_quality = apply_brilliant_flavor(base_quality, self.brilliant_probability, rng);

        Ok(Analysis {
            fen: game_state.get_fen(),
            evaluation,
            principal_variation: best_move.iter().cloned().collect(),
            best_move,
            depth: self.depth,
            commentary: self.templates.commentary(move_quality, rng),
            move_quality,
            threats: self.templates.threats(game_state, &legal_moves),
            suggestions: self.templates.suggestions(evaluation),
        })
    }

    /// Greedy pick: the move winning the most material at once (captured
    /// piece plus promotion gain), ties broken by long algebraic order.
    pub fn best_move<'a>(&self, legal_moves: &'a [GeneratedMove]) -> Option<&'a GeneratedMove> {
        legal_moves.iter().max_by(|a, b| {
            self.immediate_gain(a)
                .total_cmp(&self.immediate_gain(b))
                .then_with(|| b.mv.to_long_algebraic().cmp(&a.mv.to_long_algebraic()))
        })
    }

    fn immediate_gain(&self, generated: &GeneratedMove) -> f64 {
        let mv = generated.mv;
        let captured = mv
            .captured_piece
            .map_or(0.0, |kind| self.piece_values.value(kind));
        let promoted = mv.promotion.map_or(0.0, |kind| {
            self.piece_values.value(kind) - self.piece_values.value(mv.moved_piece)
        });
        captured + promoted
    }
}
