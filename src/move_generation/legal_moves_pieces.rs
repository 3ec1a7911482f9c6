//! Knight, bishop, rook and queen move generation.
//!
//! These pieces share one shape: look up the attack mask from the origin,
//! drop squares holding our own pieces, and tag anything left on an enemy
//! piece as a capture.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::enemy_piece_on;
use crate::moves::attacks::{bishop_attacks, knight_attacks, queen_attacks, rook_attacks};
use crate::moves::chess_move::{ChessMove, FLAG_CAPTURE};

pub fn generate_knight_moves(game_state: &GameState, out: &mut Vec<ChessMove>) {
    generate_piece_moves(game_state, PieceKind::Knight, |sq, _| knight_attacks(sq), out);
}

pub fn generate_bishop_moves(game_state: &GameState, out: &mut Vec<ChessMove>) {
    generate_piece_moves(game_state, PieceKind::Bishop, bishop_attacks, out);
}

pub fn generate_rook_moves(game_state: &GameState, out: &mut Vec<ChessMove>) {
    generate_piece_moves(game_state, PieceKind::Rook, rook_attacks, out);
}

pub fn generate_queen_moves(game_state: &GameState, out: &mut Vec<ChessMove>) {
    generate_piece_moves(game_state, PieceKind::Queen, queen_attacks, out);
}

fn generate_piece_moves(
    game_state: &GameState,
    kind: PieceKind,
    attacks_from: impl Fn(Square, u64) -> u64,
    out: &mut Vec<ChessMove>,
) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];

    let mut pieces = game_state.pieces[side.index()][kind.index()];
    while pieces != 0 {
        let from = pieces.trailing_zeros() as Square;
        let mut targets = attacks_from(from, game_state.occupancy_all) & !own_occ;

        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            let is_capture = (1u64 << to) & enemy_occ != 0;
            let captured = if is_capture {
                enemy_piece_on(game_state, to)
            } else {
                None
            };
            out.push(ChessMove::new(
                from,
                to,
                kind,
                captured,
                None,
                if is_capture { FLAG_CAPTURE } else { 0 },
            ));
            targets &= targets - 1;
        }

        pieces &= pieces - 1;
    }
}
