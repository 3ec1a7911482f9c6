//! FEN-to-GameState parser.
//!
//! Besides decoding the six fields, the parser rejects boards that could not
//! arise in play: a king count other than one per side, pawns on a back
//! rank, castling rights without the king and rook at home, an en-passant
//! target with no pawn that just double-stepped, or the side not to move
//! standing in check.

use crate::errors::ChessErrors;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::utils::algebraic::algebraic_to_square;

const BACK_RANKS: u64 = 0xFF00_0000_0000_00FF;

pub fn parse_fen(fen: &str) -> Result<GameState, ChessErrors> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| invalid("missing side to move"))?;
    let castling_part = parts.next().ok_or_else(|| invalid("missing castling rights"))?;
    let en_passant_part = parts.next().ok_or_else(|| invalid("missing en-passant square"))?;
    let halfmove_part = parts.next().ok_or_else(|| invalid("missing halfmove clock"))?;
    let fullmove_part = parts.next().ok_or_else(|| invalid("missing fullmove number"))?;

    if parts.next().is_some() {
        return Err(invalid("extra trailing fields"));
    }

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square = parse_en_passant_square(en_passant_part)?;
    game_state.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| invalid(&format!("invalid halfmove clock: {halfmove_part}")))?;
    game_state.fullmove_number = fullmove_part
        .parse::<u16>()
        .ok()
        .filter(|number| *number >= 1)
        .ok_or_else(|| invalid(&format!("invalid fullmove number: {fullmove_part}")))?;

    game_state.refresh_derived();
    validate_position(&game_state)?;

    Ok(game_state)
}

/// Structural checks that hold for every position reachable by legal play.
pub fn validate_position(game_state: &GameState) -> Result<(), ChessErrors> {
    for color in Color::BOTH {
        let kings = game_state.count(color, PieceKind::King);
        if kings != 1 {
            return Err(invalid(&format!("{color:?} has {kings} kings, expected exactly one")));
        }
    }

    let pawns = game_state.pieces[0][PieceKind::Pawn.index()] | game_state.pieces[1][PieceKind::Pawn.index()];
    if pawns & BACK_RANKS != 0 {
        return Err(invalid("pawn on the first or eighth rank"));
    }

    validate_castling_rights(game_state)?;
    validate_en_passant(game_state)?;

    if is_king_in_check(game_state, game_state.side_to_move.opposite()) {
        return Err(invalid("side not to move is in check"));
    }

    Ok(())
}

fn validate_castling_rights(game_state: &GameState) -> Result<(), ChessErrors> {
    let checks = [
        (CASTLE_LIGHT_KINGSIDE, Color::Light, 4u8, 7u8),
        (CASTLE_LIGHT_QUEENSIDE, Color::Light, 4, 0),
        (CASTLE_DARK_KINGSIDE, Color::Dark, 60, 63),
        (CASTLE_DARK_QUEENSIDE, Color::Dark, 60, 56),
    ];
    for (right, color, king_sq, rook_sq) in checks {
        if game_state.castling_rights & right == 0 {
            continue;
        }
        let king_home = game_state.piece_at(king_sq) == Some(Piece::new(color, PieceKind::King));
        let rook_home = game_state.piece_at(rook_sq) == Some(Piece::new(color, PieceKind::Rook));
        if !king_home || !rook_home {
            return Err(invalid("castling right without king and rook on their home squares"));
        }
    }
    Ok(())
}

fn validate_en_passant(game_state: &GameState) -> Result<(), ChessErrors> {
    let Some(target) = game_state.en_passant_square else {
        return Ok(());
    };
    // The pawn that just double-stepped belongs to the side not to move.
    let (target_rank, pawn_sq, origin_sq) = match game_state.side_to_move {
        Color::Light => (5, target.wrapping_sub(8), target.wrapping_add(8)),
        Color::Dark => (2, target.wrapping_add(8), target.wrapping_sub(8)),
    };
    let mover = game_state.side_to_move.opposite();
    if square_rank(target) != target_rank
        || game_state.piece_at(pawn_sq) != Some(Piece::new(mover, PieceKind::Pawn))
        || game_state.piece_at(target).is_some()
        || game_state.piece_at(origin_sq).is_some()
    {
        return Err(invalid("en-passant target does not follow a double pawn push"));
    }
    Ok(())
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), ChessErrors> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx;
        let mut file = 0usize;
        let mut previous_was_digit = false;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) || previous_was_digit {
                    return Err(invalid(&format!("invalid empty-square run in rank '{rank_str}'")));
                }
                file += empty_count as usize;
                previous_was_digit = true;
                continue;
            }
            previous_was_digit = false;

            let piece = Piece::from_fen_char(ch)
                .ok_or_else(|| invalid(&format!("invalid piece character '{ch}'")))?;
            if file >= 8 {
                return Err(invalid(&format!("rank '{rank_str}' has too many files")));
            }

            let sq = board_rank * 8 + file;
            game_state.pieces[piece.color.index()][piece.kind.index()] |= 1u64 << sq;
            file += 1;
        }

        if file != 8 {
            return Err(invalid(&format!("rank '{rank_str}' does not cover 8 files")));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, ChessErrors> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(invalid(&format!("invalid side-to-move field: {side_part}"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, ChessErrors> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        let right = match ch {
            'K' => CASTLE_LIGHT_KINGSIDE,
            'Q' => CASTLE_LIGHT_QUEENSIDE,
            'k' => CASTLE_DARK_KINGSIDE,
            'q' => CASTLE_DARK_QUEENSIDE,
            _ => return Err(invalid(&format!("invalid castling rights character: {ch}"))),
        };
        // Rights must appear once each, in KQkq order.
        if rights & right != 0 || rights >= right {
            return Err(invalid(&format!("castling rights out of order: {castling_part}")));
        }
        rights |= right;
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, ChessErrors> {
    if en_passant_part == "-" {
        return Ok(None);
    }
    algebraic_to_square(en_passant_part)
        .map(Some)
        .map_err(|_| invalid(&format!("invalid en-passant square: {en_passant_part}")))
}

fn invalid(reason: &str) -> ChessErrors {
    ChessErrors::InvalidPosition(reason.to_owned())
}
