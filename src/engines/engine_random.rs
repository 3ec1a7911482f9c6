//! Random-move opponent.
//!
//! Picks uniformly among the legal moves, except that when any capture is
//! available it restricts the choice to captures with a configurable
//! probability. Used as the sparring partner in single-player mode.

use log::trace;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engines::engine_trait::Engine;
use crate::errors::ChessErrors;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};
use crate::moves::chess_move::ChessMove;

pub const DEFAULT_CAPTURE_PREFERENCE: f64 = 0.7;

pub struct RandomEngine {
    move_generator: LegalMoveGenerator,
    capture_preference: f64,
    rng: StdRng,
}

impl RandomEngine {
    pub fn new(capture_preference: f64) -> Self {
        Self::with_rng(capture_preference, StdRng::from_os_rng())
    }

    pub fn seeded(capture_preference: f64, seed: u64) -> Self {
        Self::with_rng(capture_preference, StdRng::seed_from_u64(seed))
    }

    fn with_rng(capture_preference: f64, rng: StdRng) -> Self {
        Self {
            move_generator: LegalMoveGenerator,
            capture_preference: capture_preference.clamp(0.0, 1.0),
            rng,
        }
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTURE_PREFERENCE)
    }
}

/// Choose from `legal_moves` with the capture bias applied.
pub fn pick_move<'a, R: Rng + ?Sized>(
    legal_moves: &'a [GeneratedMove],
    capture_preference: f64,
    rng: &mut R,
) -> Option<&'a GeneratedMove> {
    let captures: Vec<&GeneratedMove> = legal_moves.iter().filter(|g| g.mv.is_capture()).collect();
    if !captures.is_empty() && rng.random_bool(capture_preference.clamp(0.0, 1.0)) {
        return captures.choose(rng).copied();
    }
    legal_moves.choose(rng)
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "Coach Chess Random"
    }

    fn choose_move(&mut self, game_state: &GameState) -> Result<Option<ChessMove>, ChessErrors> {
        let legal_moves = self.move_generator.generate_legal_moves(game_state)?;
        trace!("random engine choosing among {} legal moves", legal_moves.len());

        Ok(pick_move(&legal_moves, self.capture_preference, &mut self.rng).map(|g| g.mv))
    }
}

#[cfg(test)]
mod tests {
    use super::{pick_move, RandomEngine};
    use crate::engines::engine_trait::Engine;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_generator::LegalMoveGenerator;
    use crate::move_generation::move_generator::MoveGenerator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // One capture (exd5) among many quiet moves.
    const ONE_CAPTURE: &str = "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1";

    #[test]
    fn always_captures_at_full_preference() {
        let game = GameState::from_fen(ONE_CAPTURE).expect("FEN");
        let legal = LegalMoveGenerator.generate_legal_moves(&game).expect("gen");
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let picked = pick_move(&legal, 1.0, &mut rng).expect("move");
            assert!(picked.mv.is_capture());
        }
    }

    #[test]
    fn picks_are_legal_and_none_when_mated() {
        let mut engine = RandomEngine::seeded(0.7, 1);
        let game = GameState::new_game();
        let legal = LegalMoveGenerator.generate_legal_moves(&game).expect("gen");
        for _ in 0..20 {
            let mv = engine.choose_move(&game).expect("choose").expect("a move");
            assert!(legal.iter().any(|g| g.mv == mv));
        }

        let mated = GameState::from_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1").expect("FEN");
        assert_eq!(engine.choose_move(&mated).expect("choose"), None);
    }

    #[test]
    fn zero_preference_still_plays_quiet_moves() {
        let game = GameState::from_fen(ONE_CAPTURE).expect("FEN");
        let legal = LegalMoveGenerator.generate_legal_moves(&game).expect("gen");
        let mut rng = StdRng::seed_from_u64(2);
        let quiet = (0..200)
            .filter_map(|_| pick_move(&legal, 0.0, &mut rng))
            .filter(|g| !g.mv.is_capture())
            .count();
        assert!(quiet > 0);
    }
}
