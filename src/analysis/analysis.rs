use serde::{Deserialize, Serialize};

use crate::analysis::move_quality::MoveQuality;

/// Result of analysing one position. Shared out of the cache as
/// `Arc<Analysis>` and never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// FEN of the analysed position.
    pub fen: String,
    /// White-positive score in pawn units, clamped.
    pub evaluation: f64,
    /// SAN of the suggested move, absent when there is no legal move.
    pub best_move: Option<String>,
    pub principal_variation: Vec<String>,
    /// Nominal depth reported to the user; no search is performed.
    pub depth: u8,
    pub commentary: String,
    pub move_quality: MoveQuality,
    pub threats: Vec<String>,
    pub suggestions: Vec<String>,
}
