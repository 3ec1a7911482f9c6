//! Read-only views of a game for rendering and persistence.

use serde::{Deserialize, Serialize};

use crate::game::game_status::{DrawReason, GameStatus};
use crate::game::move_record::MoveRecord;
use crate::game_state::chess_types::{Color, PieceKind};

/// Pieces taken from each side, in capture order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPieces {
    /// White pieces captured by black.
    pub white: Vec<PieceKind>,
    /// Black pieces captured by white.
    pub black: Vec<PieceKind>,
}

impl CapturedPieces {
    /// Tally captures from the recorded history.
    pub fn from_history(history: &[MoveRecord]) -> Self {
        let mut captured = Self::default();
        for record in history {
            if let Some(kind) = record.mv.captured_piece {
                match record.mover {
                    Color::Light => captured.black.push(kind),
                    Color::Dark => captured.white.push(kind),
                }
            }
        }
        captured
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub fen: String,
    pub side_to_move: Color,
    pub status: GameStatus,
    pub is_game_over: bool,
    pub in_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    pub is_draw: bool,
    pub draw_reason: Option<DrawReason>,
    /// Legal moves of the current position in SAN.
    pub legal_moves: Vec<String>,
    pub history: Vec<MoveRecord>,
    pub captured: CapturedPieces,
}
