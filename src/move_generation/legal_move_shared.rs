use crate::game_state::{chess_types::*, game_state::GameState};

/// Kind of the opponent piece on `square`, if any.
#[inline]
pub fn enemy_piece_on(game_state: &GameState, square: Square) -> Option<PieceKind> {
    let enemy = game_state.side_to_move.opposite();
    let mask = 1u64 << square;
    PieceKind::ALL
        .into_iter()
        .find(|kind| game_state.pieces[enemy.index()][kind.index()] & mask != 0)
}
