//! Bitboard board model.
//!
//! `GameState` stores piece bitboards, occupancy caches, side to move,
//! castling rights, the en-passant target and both move counters. It is a
//! plain value: move application produces a new state instead of mutating
//! in place, so positions can be kept in history and compared freely.

use crate::errors::ChessErrors;
use crate::game_state::chess_types::*;
use crate::game_state::zobrist::compute_zobrist_key;
use crate::move_generation::legal_move_checks::{is_king_in_check, is_square_attacked, king_square};
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

const START_PIECES: [[u64; 6]; 2] = [
    [
        0x0000_0000_0000_FF00,
        0x0000_0000_0000_0042,
        0x0000_0000_0000_0024,
        0x0000_0000_0000_0081,
        0x0000_0000_0000_0008,
        0x0000_0000_0000_0010,
    ],
    [
        0x00FF_0000_0000_0000,
        0x4200_0000_0000_0000,
        0x2400_0000_0000_0000,
        0x8100_0000_0000_0000,
        0x0800_0000_0000_0000,
        0x1000_0000_0000_0000,
    ],
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    /// Position identity used for repetition detection.
    pub zobrist_key: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist_key: 0,
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard starting position.
    pub fn new_game() -> Self {
        let mut game_state = Self {
            pieces: START_PIECES,
            castling_rights: CASTLE_ALL,
            ..Self::default()
        };
        game_state.refresh_derived();
        game_state
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, ChessErrors> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    /// Piece on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if square > 63 {
            return None;
        }
        let mask = 1u64 << square;
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in Color::BOTH {
            for kind in PieceKind::ALL {
                if self.pieces[color.index()][kind.index()] & mask != 0 {
                    return Some(Piece::new(color, kind));
                }
            }
        }
        None
    }

    /// Put `piece` on `square`, returning whatever stood there before.
    pub fn place_piece(&mut self, square: Square, piece: Piece) -> Result<Option<Piece>, ChessErrors> {
        let previous = self.remove_piece(square)?;
        self.pieces[piece.color.index()][piece.kind.index()] |= 1u64 << square;
        self.refresh_derived();
        Ok(previous)
    }

    /// Clear `square`, returning the piece that stood there.
    pub fn remove_piece(&mut self, square: Square) -> Result<Option<Piece>, ChessErrors> {
        check_square(square)?;
        let previous = self.piece_at(square);
        if let Some(piece) = previous {
            self.pieces[piece.color.index()][piece.kind.index()] &= !(1u64 << square);
            self.refresh_derived();
        }
        Ok(previous)
    }

    /// Relocate the piece on `from` to `to` without any rule checks,
    /// returning the piece displaced from `to`.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<Option<Piece>, ChessErrors> {
        check_square(to)?;
        let piece = self
            .remove_piece(from)?
            .ok_or_else(|| ChessErrors::IllegalMove(format!("no piece on square {from}")))?;
        self.place_piece(to, piece)
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        king_square(self, color)
    }

    /// Whether any piece of `by` attacks `square`.
    #[inline]
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        is_square_attacked(self, square, by)
    }

    /// Whether the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        is_king_in_check(self, self.side_to_move)
    }

    #[inline]
    pub fn count(&self, color: Color, kind: PieceKind) -> u32 {
        self.pieces[color.index()][kind.index()].count_ones()
    }

    /// Rebuild occupancy caches and the position key from the piece bitboards.
    pub fn refresh_derived(&mut self) {
        for color in Color::BOTH {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[0] | self.occupancy_by_color[1];
        self.zobrist_key = compute_zobrist_key(self);
    }
}

fn check_square(square: Square) -> Result<(), ChessErrors> {
    if square > 63 {
        return Err(ChessErrors::InvalidAlgebraic(format!(
            "square index out of bounds: {square}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, Piece, PieceKind};

    #[test]
    fn new_game_matches_starting_fen() {
        let built = GameState::new_game();
        let parsed = GameState::from_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(built, parsed);
        assert_eq!(built.get_fen(), STARTING_POSITION_FEN);
    }

    #[test]
    fn piece_at_reports_color_and_kind() {
        let game = GameState::new_game();
        assert_eq!(game.piece_at(4), Some(Piece::new(Color::Light, PieceKind::King)));
        assert_eq!(game.piece_at(59), Some(Piece::new(Color::Dark, PieceKind::Queen)));
        assert_eq!(game.piece_at(28), None);
        assert_eq!(game.piece_at(64), None);
    }

    #[test]
    fn place_remove_and_move_keep_occupancy_in_sync() {
        let mut game = GameState::new_empty();
        let rook = Piece::new(Color::Light, PieceKind::Rook);
        assert_eq!(game.place_piece(0, rook).expect("place"), None);
        assert_eq!(game.occupancy_all, 1);

        let displaced = game
            .place_piece(8, Piece::new(Color::Dark, PieceKind::Pawn))
            .expect("place");
        assert_eq!(displaced, None);

        let captured = game.move_piece(0, 8).expect("move");
        assert_eq!(captured, Some(Piece::new(Color::Dark, PieceKind::Pawn)));
        assert_eq!(game.piece_at(8), Some(rook));
        assert_eq!(game.occupancy_all, 1u64 << 8);
        assert_eq!(game.occupancy_by_color[Color::Dark.index()], 0);

        assert_eq!(game.remove_piece(8).expect("remove"), Some(rook));
        assert_eq!(game.occupancy_all, 0);
        assert!(game.move_piece(8, 9).is_err());
    }

    #[test]
    fn square_attack_query_uses_current_occupancy() {
        let game = GameState::new_game();
        // f3 is covered by the g1 knight and the e2/g2 pawns.
        assert!(game.is_square_attacked(21, Color::Light));
        assert!(!game.is_square_attacked(28, Color::Light));
        assert!(game.is_square_attacked(45, Color::Dark));
        assert!(!game.in_check());
    }
}
