use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};

#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> Option<Square> {
    let kings = game_state.pieces[color.index()][PieceKind::King.index()];
    if kings == 0 {
        None
    } else {
        Some(kings.trailing_zeros() as Square)
    }
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = king_square(game_state, color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

/// Whether any piece of `attacker_color` could capture on `square`.
///
/// Each test looks outward from the target with the attack pattern of the
/// piece kind in question; pawns use the opposite color's pattern because a
/// pawn attacks toward the square we are standing on.
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    if square > 63 {
        return false;
    }
    let theirs = &game_state.pieces[attacker_color.index()];
    let occupancy = game_state.occupancy_all;

    if pawn_attacks(attacker_color.opposite(), square) & theirs[PieceKind::Pawn.index()] != 0 {
        return true;
    }
    if knight_attacks(square) & theirs[PieceKind::Knight.index()] != 0 {
        return true;
    }
    if king_attacks(square) & theirs[PieceKind::King.index()] != 0 {
        return true;
    }

    let queens = theirs[PieceKind::Queen.index()];
    if bishop_attacks(square, occupancy) & (theirs[PieceKind::Bishop.index()] | queens) != 0 {
        return true;
    }
    rook_attacks(square, occupancy) & (theirs[PieceKind::Rook.index()] | queens) != 0
}

#[cfg(test)]
mod tests {
    use super::{is_king_in_check, is_square_attacked, king_square};
    use crate::game_state::chess_types::Color;
    use crate::game_state::game_state::GameState;

    #[test]
    fn sliding_attack_is_blocked_by_interposed_piece() {
        let open = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").expect("FEN should parse");
        assert!(is_square_attacked(&open, 56, Color::Light));

        let blocked =
            GameState::from_fen("4k3/8/8/8/p7/8/8/R3K3 w - - 0 1").expect("FEN should parse");
        assert!(is_square_attacked(&blocked, 24, Color::Light));
        assert!(!is_square_attacked(&blocked, 32, Color::Light));
    }

    #[test]
    fn pawn_attacks_are_diagonal_only() {
        let game = GameState::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        // d5 black pawn attacks c4 and e4, not d4.
        assert!(is_square_attacked(&game, 26, Color::Dark));
        assert!(is_square_attacked(&game, 28, Color::Dark));
        assert!(!is_square_attacked(&game, 27, Color::Dark));
    }

    #[test]
    fn detects_check_on_king() {
        let game =
            GameState::from_fen("4k3/8/8/8/7b/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(king_square(&game, Color::Light), Some(4));
        assert!(is_king_in_check(&game, Color::Light));
        assert!(!is_king_in_check(&game, Color::Dark));
    }
}
