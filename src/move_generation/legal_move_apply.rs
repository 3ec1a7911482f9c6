use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_moves_king::castling_rook_squares;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError};
use crate::moves::chess_move::ChessMove;

/// Produce the position after `mv`. The move is trusted to be pseudo-legal
/// for `game_state`; only a missing moving piece is reported.
pub fn apply_move(game_state: &GameState, mv: ChessMove) -> MoveGenResult<GameState> {
    let from_mask = 1u64 << mv.from;
    let to_mask = 1u64 << mv.to;

    let moving_color = game_state.side_to_move;
    let enemy_color = moving_color.opposite();

    if game_state.pieces[moving_color.index()][mv.moved_piece.index()] & from_mask == 0 {
        return Err(MoveGenerationError::InvalidState(format!(
            "no {:?} of the side to move on square {}",
            mv.moved_piece, mv.from
        )));
    }

    let mut next = game_state.clone();
    next.pieces[moving_color.index()][mv.moved_piece.index()] &= !from_mask;

    if mv.is_en_passant() {
        let capture_sq = match moving_color {
            Color::Light => mv.to.checked_sub(8),
            Color::Dark => mv.to.checked_add(8),
        }
        .ok_or_else(|| MoveGenerationError::InvalidState("invalid en-passant target".to_owned()))?;
        next.pieces[enemy_color.index()][PieceKind::Pawn.index()] &= !(1u64 << capture_sq);
    } else if mv.is_capture() {
        for board in &mut next.pieces[enemy_color.index()] {
            *board &= !to_mask;
        }
    }

    let placed = mv.promotion.unwrap_or(mv.moved_piece);
    next.pieces[moving_color.index()][placed.index()] |= to_mask;

    if mv.is_castling() {
        if let Some((rook_from, rook_to)) = castling_rook_squares(mv.from, mv.to) {
            let rooks = &mut next.pieces[moving_color.index()][PieceKind::Rook.index()];
            *rooks = (*rooks & !(1u64 << rook_from)) | (1u64 << rook_to);
        }
    }

    update_castling_rights(&mut next, moving_color, mv);

    next.en_passant_square = if mv.is_double_pawn_push() {
        Some((mv.from + mv.to) / 2)
    } else {
        None
    };

    if mv.moved_piece == PieceKind::Pawn || mv.is_capture() {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Dark {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = enemy_color;
    next.refresh_derived();

    Ok(next)
}

fn update_castling_rights(game_state: &mut GameState, moving_color: Color, mv: ChessMove) {
    if mv.moved_piece == PieceKind::King {
        game_state.castling_rights &= match moving_color {
            Color::Light => !(CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE),
            Color::Dark => !(CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE),
        };
    }

    // A rook leaving or being captured on its home square loses that right.
    for square in [mv.from, mv.to] {
        game_state.castling_rights &= match square {
            0 => !CASTLE_LIGHT_QUEENSIDE,
            7 => !CASTLE_LIGHT_KINGSIDE,
            56 => !CASTLE_DARK_QUEENSIDE,
            63 => !CASTLE_DARK_KINGSIDE,
            _ => CASTLE_ALL,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::apply_move;
    use crate::game_state::chess_types::*;
    use crate::game_state::game_state::GameState;
    use crate::moves::chess_move::{ChessMove, FLAG_CAPTURE, FLAG_CASTLING, FLAG_EN_PASSANT};

    #[test]
    fn castling_moves_the_rook_and_clears_rights() {
        let game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10").expect("FEN");
        let mv = ChessMove::new(4, 6, PieceKind::King, None, None, FLAG_CASTLING);
        let next = apply_move(&game, mv).expect("castle applies");
        assert_eq!(next.get_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 4 10");
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let game = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN");
        let mv = ChessMove::new(
            36,
            43,
            PieceKind::Pawn,
            Some(PieceKind::Pawn),
            None,
            FLAG_CAPTURE | FLAG_EN_PASSANT,
        );
        let next = apply_move(&game, mv).expect("en passant applies");
        assert_eq!(next.get_fen(), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 2");
    }

    #[test]
    fn capturing_a_home_rook_removes_its_castling_right() {
        let game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN");
        let mv = ChessMove::new(0, 56, PieceKind::Rook, Some(PieceKind::Rook), None, FLAG_CAPTURE);
        let next = apply_move(&game, mv).expect("capture applies");
        assert_eq!(next.castling_rights, CASTLE_LIGHT_KINGSIDE | CASTLE_DARK_KINGSIDE);
        assert_eq!(next.halfmove_clock, 0);
    }

    #[test]
    fn missing_moving_piece_is_an_error() {
        let game = GameState::new_game();
        let mv = ChessMove::new(28, 36, PieceKind::Pawn, None, None, 0);
        assert!(apply_move(&game, mv).is_err());
    }
}
