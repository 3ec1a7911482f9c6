use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::enemy_piece_on;
use crate::moves::attacks::king_attacks;
use crate::moves::chess_move::{ChessMove, FLAG_CAPTURE, FLAG_CASTLING};

/// Geometry of one castling option.
struct CastlePath {
    right: CastlingRights,
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    /// Squares that must be empty.
    between: u64,
    /// Squares the king passes through or lands on; none may be attacked.
    king_path: [Square; 2],
}

const CASTLE_PATHS: [CastlePath; 4] = [
    CastlePath {
        right: CASTLE_LIGHT_KINGSIDE,
        king_from: 4,
        king_to: 6,
        rook_from: 7,
        between: (1 << 5) | (1 << 6),
        king_path: [5, 6],
    },
    CastlePath {
        right: CASTLE_LIGHT_QUEENSIDE,
        king_from: 4,
        king_to: 2,
        rook_from: 0,
        between: (1 << 1) | (1 << 2) | (1 << 3),
        king_path: [3, 2],
    },
    CastlePath {
        right: CASTLE_DARK_KINGSIDE,
        king_from: 60,
        king_to: 62,
        rook_from: 63,
        between: (1 << 61) | (1 << 62),
        king_path: [61, 62],
    },
    CastlePath {
        right: CASTLE_DARK_QUEENSIDE,
        king_from: 60,
        king_to: 58,
        rook_from: 56,
        between: (1 << 57) | (1 << 58) | (1 << 59),
        king_path: [59, 58],
    },
];

/// Rook relocation for a castling king move, as `(rook_from, rook_to)`.
pub fn castling_rook_squares(king_from: Square, king_to: Square) -> Option<(Square, Square)> {
    match (king_from, king_to) {
        (4, 6) => Some((7, 5)),
        (4, 2) => Some((0, 3)),
        (60, 62) => Some((63, 61)),
        (60, 58) => Some((56, 59)),
        _ => None,
    }
}

pub fn generate_king_moves(game_state: &GameState, out: &mut Vec<ChessMove>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];
    let king_bb = game_state.pieces[side.index()][PieceKind::King.index()];
    if king_bb == 0 {
        return;
    }

    let from = king_bb.trailing_zeros() as Square;
    let mut targets = king_attacks(from) & !own_occ;
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
            PieceKind::King,
            captured,
            None,
            if is_capture { FLAG_CAPTURE } else { 0 },
        ));
        targets &= targets - 1;
    }

    generate_castling_moves(game_state, out, from);
}

fn generate_castling_moves(game_state: &GameState, out: &mut Vec<ChessMove>, king_from: Square) {
    let side = game_state.side_to_move;
    let enemy = side.opposite();
    let own_rooks = game_state.pieces[side.index()][PieceKind::Rook.index()];

    // Cannot castle out of check.
    if is_square_attacked(game_state, king_from, enemy) {
        return;
    }

    for path in &CASTLE_PATHS {
        if path.king_from != king_from
            || game_state.castling_rights & path.right == 0
            || own_rooks & (1u64 << path.rook_from) == 0
            || game_state.occupancy_all & path.between != 0
        {
            continue;
        }
        if path
            .king_path
            .iter()
            .any(|sq| is_square_attacked(game_state, *sq, enemy))
        {
            continue;
        }
        out.push(ChessMove::new(
            path.king_from,
            path.king_to,
            PieceKind::King,
            None,
            None,
            FLAG_CASTLING,
        ));
    }
}
