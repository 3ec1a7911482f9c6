//! Canonical chess-rule constants and material-based draw detection.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Half-moves without a capture or pawn move that end the game in a draw.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

/// Occurrences of one position that end the game in a draw.
pub const REPETITION_DRAW_COUNT: usize = 3;

const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;

/// Neither side can possibly deliver mate: bare kings, a single minor
/// piece, or bishops that all stand on one square color.
pub fn has_insufficient_material(game_state: &GameState) -> bool {
    let heavy_or_pawn = |color: Color| {
        game_state.count(color, PieceKind::Pawn)
            + game_state.count(color, PieceKind::Rook)
            + game_state.count(color, PieceKind::Queen)
    };
    if heavy_or_pawn(Color::Light) + heavy_or_pawn(Color::Dark) > 0 {
        return false;
    }

    let knights: u32 = Color::BOTH
        .iter()
        .map(|c| game_state.count(*c, PieceKind::Knight))
        .sum();
    let bishops = game_state.pieces[0][PieceKind::Bishop.index()]
        | game_state.pieces[1][PieceKind::Bishop.index()];
    let bishop_count = bishops.count_ones();

    match (knights, bishop_count) {
        (0, 0) | (1, 0) | (0, 1) => true,
        (0, _) => bishops & LIGHT_SQUARES == 0 || bishops & !LIGHT_SQUARES == 0,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::has_insufficient_material;
    use crate::game_state::game_state::GameState;

    fn insufficient(fen: &str) -> bool {
        has_insufficient_material(&GameState::from_fen(fen).expect("FEN should parse"))
    }

    #[test]
    fn bare_kings_and_single_minors_are_insufficient() {
        assert!(insufficient("4k3/8/8/8/8/8/8/4K3 w - - 0 1"));
        assert!(insufficient("4k3/8/8/8/8/8/8/2N1K3 w - - 0 1"));
        assert!(insufficient("4k3/8/3b4/8/8/8/8/4K3 w - - 0 1"));
    }

    #[test]
    fn same_colored_bishops_are_insufficient() {
        // c1 and f4 are both dark squares.
        assert!(insufficient("4k3/8/8/8/5b2/8/8/2B1K3 w - - 0 1"));
        // c1 dark, c8 light.
        assert!(!insufficient("2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1"));
    }

    #[test]
    fn pawns_rooks_or_two_knights_with_bishop_are_sufficient() {
        assert!(!insufficient("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"));
        assert!(!insufficient("4k3/8/8/8/8/8/8/R3K3 w - - 0 1"));
        assert!(!insufficient("4k3/8/8/8/8/8/8/1NB1K3 w - - 0 1"));
    }
}
