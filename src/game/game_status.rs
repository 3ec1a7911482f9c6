//! Terminal-state classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game_state::chess_rules::{
    has_insufficient_material, FIFTY_MOVE_HALFMOVES, REPETITION_DRAW_COUNT,
};
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    Checkmate { winner: Color },
    Stalemate,
    Draw(DrawReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Active,
    GameOver(GameOverReason),
}

impl GameStatus {
    /// Classify a position given its legal-move count and how many times it
    /// has occurred in the game so far (including now).
    ///
    /// Having no legal move decides the game before any draw rule does, and
    /// when several draw rules apply only the first is reported.
    pub fn classify(game_state: &GameState, legal_move_count: usize, occurrences: usize) -> Self {
        if legal_move_count == 0 {
            let reason = if game_state.in_check() {
                GameOverReason::Checkmate {
                    winner: game_state.side_to_move.opposite(),
                }
            } else {
                GameOverReason::Stalemate
            };
            return GameStatus::GameOver(reason);
        }

        let draw = if game_state.halfmove_clock >= FIFTY_MOVE_HALFMOVES {
            Some(DrawReason::FiftyMoveRule)
        } else if occurrences >= REPETITION_DRAW_COUNT {
            Some(DrawReason::ThreefoldRepetition)
        } else if has_insufficient_material(game_state) {
            Some(DrawReason::InsufficientMaterial)
        } else {
            None
        };

        match draw {
            Some(reason) => GameStatus::GameOver(GameOverReason::Draw(reason)),
            None => GameStatus::Active,
        }
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        matches!(self, GameStatus::GameOver(_))
    }

    #[inline]
    pub fn is_checkmate(&self) -> bool {
        matches!(self, GameStatus::GameOver(GameOverReason::Checkmate { .. }))
    }

    #[inline]
    pub fn is_stalemate(&self) -> bool {
        matches!(self, GameStatus::GameOver(GameOverReason::Stalemate))
    }

    #[inline]
    pub fn draw_reason(&self) -> Option<DrawReason> {
        match self {
            GameStatus::GameOver(GameOverReason::Draw(reason)) => Some(*reason),
            _ => None,
        }
    }

    /// PGN result token.
    pub fn result_token(&self) -> &'static str {
        match self {
            GameStatus::Active => "*",
            GameStatus::GameOver(GameOverReason::Checkmate { winner: Color::Light }) => "1-0",
            GameStatus::GameOver(GameOverReason::Checkmate { winner: Color::Dark }) => "0-1",
            GameStatus::GameOver(GameOverReason::Stalemate | GameOverReason::Draw(_)) => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOverReason::Checkmate { winner: Color::Light } => write!(f, "checkmate, white wins"),
            GameOverReason::Checkmate { winner: Color::Dark } => write!(f, "checkmate, black wins"),
            GameOverReason::Stalemate => write!(f, "stalemate"),
            GameOverReason::Draw(DrawReason::FiftyMoveRule) => write!(f, "draw by the fifty-move rule"),
            GameOverReason::Draw(DrawReason::ThreefoldRepetition) => {
                write!(f, "draw by threefold repetition")
            }
            GameOverReason::Draw(DrawReason::InsufficientMaterial) => {
                write!(f, "draw by insufficient material")
            }
        }
    }
}
