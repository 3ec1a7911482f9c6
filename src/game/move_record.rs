use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::move_quality::MoveQuality;
use crate::game_state::chess_types::Color;
use crate::moves::chess_move::ChessMove;

/// One played move as kept in the game history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub mv: ChessMove,
    pub mover: Color,
    /// Long algebraic id, e.g. `e2e4`.
    pub lan: String,
    /// SAN including any check or mate suffix.
    pub san: String,
    pub fen_after: String,
    pub timestamp: DateTime<Utc>,
    /// Filled in once an analysis of the resulting position is accepted.
    pub evaluation: Option<f64>,
    pub quality: Option<MoveQuality>,
}
