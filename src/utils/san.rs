//! Standard algebraic notation (SAN) for history display and PGN.
//!
//! SAN depends on the position: disambiguation looks at the other legal
//! moves, and the `+`/`#` suffix at the reply position. Parsing therefore
//! renders every legal move and compares, which keeps the two directions
//! consistent by construction.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::has_legal_move;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenResult};
use crate::moves::chess_move::ChessMove;

/// Full SAN of `generated`, including the check or mate suffix.
pub fn move_to_san(generated: &GeneratedMove, legal_moves: &[GeneratedMove]) -> MoveGenResult<String> {
    let mut san = san_body(generated.mv, legal_moves);
    san.push_str(check_suffix(&generated.game_after_move)?);
    Ok(san)
}

/// Resolve a SAN token against the legal moves of the current position.
/// Check/mate marks, annotation glyphs and the `=` before a promotion piece
/// are optional; castling may be written with zeros.
pub fn san_to_move<'a>(legal_moves: &'a [GeneratedMove], san: &str) -> Option<&'a GeneratedMove> {
    let wanted = normalize(san);
    if wanted.is_empty() {
        return None;
    }
    legal_moves
        .iter()
        .find(|generated| normalize(&san_body(generated.mv, legal_moves)) == wanted)
}

fn check_suffix(after: &GameState) -> MoveGenResult<&'static str> {
    if !is_king_in_check(after, after.side_to_move) {
        return Ok("");
    }
    Ok(if has_legal_move(after)? { "+" } else { "#" })
}

fn san_body(mv: ChessMove, legal_moves: &[GeneratedMove]) -> String {
    if mv.is_castling() {
        let castle = if square_file(mv.to) == 6 { "O-O" } else { "O-O-O" };
        return castle.to_owned();
    }

    let mut out = String::with_capacity(8);
    if mv.moved_piece == PieceKind::Pawn {
        if mv.is_capture() {
            out.push(file_char(mv.from));
        }
    } else {
        out.push(mv.moved_piece.to_char().to_ascii_uppercase());
        out.push_str(&disambiguation(mv, legal_moves));
    }

    if mv.is_capture() {
        out.push('x');
    }
    out.push(file_char(mv.to));
    out.push(rank_char(mv.to));

    if let Some(promo) = mv.promotion {
        out.push('=');
        out.push(promo.to_char().to_ascii_uppercase());
    }
    out
}

fn disambiguation(mv: ChessMove, legal_moves: &[GeneratedMove]) -> String {
    let rivals: Vec<Square> = legal_moves
        .iter()
        .map(|generated| generated.mv)
        .filter(|other| other.moved_piece == mv.moved_piece && other.to == mv.to && other.from != mv.from)
        .map(|other| other.from)
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| square_file(*sq) != square_file(mv.from)) {
        file_char(mv.from).to_string()
    } else if rivals.iter().all(|sq| square_rank(*sq) != square_rank(mv.from)) {
        rank_char(mv.from).to_string()
    } else {
        format!("{}{}", file_char(mv.from), rank_char(mv.from))
    }
}

fn normalize(san: &str) -> String {
    san.trim()
        .trim_end_matches(['+', '#', '!', '?'])
        .replace('0', "O")
        .replace('=', "")
}

#[inline]
fn file_char(square: Square) -> char {
    char::from(b'a' + square_file(square))
}

#[inline]
fn rank_char(square: Square) -> char {
    char::from(b'1' + square_rank(square))
}
