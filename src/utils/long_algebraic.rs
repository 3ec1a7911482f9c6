//! Long algebraic move identifiers (`e2e4`, `e7e8q`).
//!
//! Parsing only splits the token into squares and an optional promotion
//! piece; whether such a move exists is decided against the legal-move list
//! of a concrete position.

use crate::errors::ChessErrors;
use crate::game_state::chess_types::{PieceKind, Square};
use crate::move_generation::move_generator::GeneratedMove;
use crate::utils::algebraic::algebraic_to_square;

/// Squares and optional promotion piece of a long algebraic token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

pub fn parse_long_algebraic(long_algebraic: &str) -> Result<MoveRequest, ChessErrors> {
    let token = long_algebraic.trim();
    if !token.is_ascii() || (token.len() != 4 && token.len() != 5) {
        return Err(ChessErrors::InvalidAlgebraic(format!(
            "invalid long algebraic move: {long_algebraic}"
        )));
    }

    let from = algebraic_to_square(&token[0..2])?;
    let to = algebraic_to_square(&token[2..4])?;
    let promotion = token[4..].chars().next().map(char_to_promotion).transpose()?;

    Ok(MoveRequest { from, to, promotion })
}

/// Find the legal move matching `request`. A pawn reaching the last rank
/// without an explicit piece promotes to a queen.
pub fn find_requested_move<'a>(
    legal_moves: &'a [GeneratedMove],
    request: MoveRequest,
) -> Option<&'a GeneratedMove> {
    let wanted_promotion = request.promotion.or(Some(PieceKind::Queen));
    legal_moves.iter().find(|generated| {
        let mv = generated.mv;
        mv.from == request.from
            && mv.to == request.to
            && (mv.promotion.is_none() || mv.promotion == wanted_promotion)
            && (request.promotion.is_none() || mv.promotion == request.promotion)
    })
}

fn char_to_promotion(ch: char) -> Result<PieceKind, ChessErrors> {
    match PieceKind::from_char(ch) {
        Some(kind) if PieceKind::PROMOTIONS.contains(&kind) => Ok(kind),
        _ => Err(ChessErrors::InvalidAlgebraic(format!(
            "invalid promotion piece character: {ch}"
        ))),
    }
}
