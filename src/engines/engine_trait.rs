//! Opponent move-picker abstraction.
//!
//! An engine only chooses among the legal moves of a position; applying the
//! move is left to the game.

use crate::errors::ChessErrors;
use crate::game_state::game_state::GameState;
use crate::moves::chess_move::ChessMove;

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    /// Pick a move for the side to move, or `None` when there is none.
    fn choose_move(&mut self, game_state: &GameState) -> Result<Option<ChessMove>, ChessErrors>;
}
