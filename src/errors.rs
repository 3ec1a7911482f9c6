//! Errors used throughout the rules engine and the coaching layer.
//!
//! `ChessErrors` is the single error type returned by game transitions,
//! notation parsing, analysis and configuration. None of its variants is
//! fatal: every failure leaves the owning `ChessGame` unchanged and is
//! reported to the caller, which decides how to re-prompt or display it.

use thiserror::Error;

use crate::move_generation::move_generator::MoveGenerationError;

/// Unified error type for the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessErrors {
    /// The requested move is not in the legal-move set of the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// A position string could not be parsed into a structurally valid board.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// Undo was requested with no move in the history.
    #[error("no move to undo")]
    EmptyHistory,

    /// An analysis resolved against a position that is no longer current.
    #[error("analysis for `{fen}` is stale")]
    AnalysisStale { fen: String },

    /// A move was submitted after the game reached a terminal state.
    #[error("game is already over: {0}")]
    GameOver(String),

    /// A square or move token is not valid algebraic notation.
    #[error("invalid algebraic notation: {0}")]
    InvalidAlgebraic(String),

    /// PGN text is malformed or contains a move that cannot be replayed.
    #[error("invalid PGN: {0}")]
    InvalidPgn(String),

    /// Configuration values are out of range or could not be decoded.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The background analysis worker has shut down.
    #[error("analysis worker is unavailable")]
    WorkerUnavailable,

    #[error(transparent)]
    MoveGeneration(#[from] MoveGenerationError),
}
