//! Full legal move generation pipeline.
//!
//! Collects pseudo-legal moves piece by piece, applies each candidate, and
//! keeps only those that leave the mover's own king unattacked. The order of
//! the returned moves is an implementation detail.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_pieces::{
    generate_bishop_moves, generate_knight_moves, generate_queen_moves, generate_rook_moves,
};
use crate::move_generation::move_generator::{GeneratedMove, MoveGenResult, MoveGenerator};
use crate::moves::chess_move::ChessMove;

#[derive(Debug, Clone, Copy, Default)]
pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>> {
        let pseudo = pseudo_legal_moves(game_state);
        let mut legal = Vec::<GeneratedMove>::with_capacity(pseudo.len());

        for mv in pseudo {
            let next = apply_move(game_state, mv)?;
            if is_king_in_check(&next, game_state.side_to_move) {
                continue;
            }
            legal.push(GeneratedMove {
                mv,
                game_after_move: next,
            });
        }

        Ok(legal)
    }
}

/// Moves that follow each piece's movement rules, ignoring king safety
/// (castling already refuses attacked transit squares).
pub fn pseudo_legal_moves(game_state: &GameState) -> Vec<ChessMove> {
    let mut pseudo = Vec::<ChessMove>::with_capacity(128);
    generate_pawn_moves(game_state, &mut pseudo);
    generate_knight_moves(game_state, &mut pseudo);
    generate_bishop_moves(game_state, &mut pseudo);
    generate_rook_moves(game_state, &mut pseudo);
    generate_queen_moves(game_state, &mut pseudo);
    generate_king_moves(game_state, &mut pseudo);
    pseudo
}

/// Whether the side to move has at least one legal move.
pub fn has_legal_move(game_state: &GameState) -> MoveGenResult<bool> {
    for mv in pseudo_legal_moves(game_state) {
        let next = apply_move(game_state, mv)?;
        if !is_king_in_check(&next, game_state.side_to_move) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{has_legal_move, LegalMoveGenerator};
    use crate::game_state::game_state::GameState;
    use crate::move_generation::move_generator::MoveGenerator;

    fn legal_count(fen: &str) -> usize {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        LegalMoveGenerator
            .generate_legal_moves(&game)
            .expect("generation should succeed")
            .len()
    }

    #[test]
    fn twenty_moves_from_the_start() {
        let game = GameState::new_game();
        assert_eq!(LegalMoveGenerator.generate_legal_moves(&game).expect("gen").len(), 20);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_pin_line() {
        // e2 knight is pinned by the e8 rook; only king moves remain legal.
        let moves = legal_count("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert_eq!(moves, 4);
    }

    #[test]
    fn promotions_expand_to_four_pieces() {
        assert_eq!(legal_count("8/P7/8/8/8/8/8/k6K w - - 0 1"), 4 + 3);
    }

    #[test]
    fn mated_side_has_no_legal_move() {
        let mated =
            GameState::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .expect("FEN should parse");
        assert!(!has_legal_move(&mated).expect("generation should succeed"));
        assert!(has_legal_move(&GameState::new_game()).expect("generation should succeed"));
    }
}
