use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game_state::chess_types::{square_file, square_rank, PieceKind, Square};

pub const FLAG_CAPTURE: u8 = 1 << 0;
pub const FLAG_DOUBLE_PAWN_PUSH: u8 = 1 << 1;
pub const FLAG_EN_PASSANT: u8 = 1 << 2;
pub const FLAG_CASTLING: u8 = 1 << 3;

/// A fully described move. The captured piece and flags are filled in by the
/// generator from the board it was generated on; a `ChessMove` never changes
/// after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub moved_piece: PieceKind,
    pub captured_piece: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub flags: u8,
}

impl ChessMove {
    #[inline]
    pub const fn new(
        from: Square,
        to: Square,
        moved_piece: PieceKind,
        captured_piece: Option<PieceKind>,
        promotion: Option<PieceKind>,
        flags: u8,
    ) -> Self {
        Self {
            from,
            to,
            moved_piece,
            captured_piece,
            promotion,
            flags,
        }
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.flags & FLAG_CAPTURE != 0
    }

    #[inline]
    pub const fn is_en_passant(&self) -> bool {
        self.flags & FLAG_EN_PASSANT != 0
    }

    #[inline]
    pub const fn is_castling(&self) -> bool {
        self.flags & FLAG_CASTLING != 0
    }

    #[inline]
    pub const fn is_double_pawn_push(&self) -> bool {
        self.flags & FLAG_DOUBLE_PAWN_PUSH != 0
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Machine-facing identifier such as `e2e4` or `e7e8q`.
    #[inline]
    pub fn to_long_algebraic(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sq in [self.from, self.to] {
            write!(
                f,
                "{}{}",
                char::from(b'a' + square_file(sq)),
                char::from(b'1' + square_rank(sq) % 8)
            )?;
        }
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChessMove, FLAG_CAPTURE, FLAG_DOUBLE_PAWN_PUSH};
    use crate::game_state::chess_types::PieceKind;

    #[test]
    fn displays_as_long_algebraic() {
        let push = ChessMove::new(12, 28, PieceKind::Pawn, None, None, FLAG_DOUBLE_PAWN_PUSH);
        assert_eq!(push.to_long_algebraic(), "e2e4");
        assert!(push.is_double_pawn_push());
        assert!(!push.is_capture());

        let promo = ChessMove::new(
            54,
            63,
            PieceKind::Pawn,
            Some(PieceKind::Rook),
            Some(PieceKind::Queen),
            FLAG_CAPTURE,
        );
        assert_eq!(promo.to_string(), "g7h8q");
        assert!(promo.is_promotion());
        assert!(promo.is_capture());
    }
}
