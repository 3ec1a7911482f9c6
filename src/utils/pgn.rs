//! PGN read/write utilities for game history interchange.
//!
//! Writes SAN movetext with the seven-tag roster (plus SetUp/FEN for games
//! that did not start from the standard position) and reads PGN back into an
//! initial position and a replayable move list. Import accepts SAN or long
//! algebraic tokens.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};

use crate::errors::ChessErrors;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};
use crate::moves::chess_move::ChessMove;
use crate::utils::long_algebraic::{find_requested_move, parse_long_algebraic};
use crate::utils::san::{move_to_san, san_to_move};

const MAX_LINE_WIDTH: usize = 80;

/// Descriptive header tags. `Result`, `SetUp` and `FEN` are derived from the
/// game itself when writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnTags {
    pub event: String,
    pub site: String,
    /// Falls back to today's local date when absent.
    pub date: Option<NaiveDate>,
    pub round: String,
    pub white: String,
    pub black: String,
}

impl Default for PgnTags {
    fn default() -> Self {
        Self {
            event: "Coach Chess Game".to_owned(),
            site: "Local".to_owned(),
            date: None,
            round: "-".to_owned(),
            white: "White".to_owned(),
            black: "Black".to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgnGame {
    pub headers: BTreeMap<String, String>,
    pub initial_state: GameState,
    pub moves: Vec<ChessMove>,
    pub final_state: GameState,
    pub result: String,
}

pub fn write_pgn(
    initial_state: &GameState,
    moves: &[ChessMove],
    tags: &PgnTags,
    result: &str,
) -> Result<String, ChessErrors> {
    let result = normalize_result(result);
    let date = tags
        .date
        .unwrap_or_else(|| Local::now().date_naive())
        .format("%Y.%m.%d")
        .to_string();

    let mut out = String::new();
    // Seven-tag roster order.
    for (key, value) in [
        ("Event", tags.event.as_str()),
        ("Site", tags.site.as_str()),
        ("Date", date.as_str()),
        ("Round", tags.round.as_str()),
        ("White", tags.white.as_str()),
        ("Black", tags.black.as_str()),
        ("Result", result),
    ] {
        push_header(&mut out, key, value);
    }

    let initial_fen = initial_state.get_fen();
    if initial_fen != STARTING_POSITION_FEN {
        push_header(&mut out, "SetUp", "1");
        push_header(&mut out, "FEN", &initial_fen);
    }
    out.push('\n');

    let mut tokens = Vec::<String>::with_capacity(moves.len() * 2 + 1);
    let mut state = initial_state.clone();
    for (index, mv) in moves.iter().enumerate() {
        let legal = LegalMoveGenerator.generate_legal_moves(&state)?;
        let generated = legal
            .iter()
            .find(|generated| generated.mv == *mv)
            .ok_or_else(|| ChessErrors::InvalidPgn(format!("move {mv} is not legal in {}", state.get_fen())))?;

        if state.side_to_move == Color::Light {
            tokens.push(format!("{}.", state.fullmove_number));
        } else if index == 0 {
            tokens.push(format!("{}...", state.fullmove_number));
        }
        tokens.push(move_to_san(generated, &legal)?);
        state = generated.game_after_move.clone();
    }
    tokens.push(result.to_owned());

    out.push_str(&wrap_tokens(&tokens));
    out.push('\n');
    Ok(out)
}

pub fn read_pgn(pgn: &str) -> Result<PgnGame, ChessErrors> {
    let mut headers = BTreeMap::<String, String>::new();
    let mut movetext_lines = Vec::<&str>::new();

    for line in pgn.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        if trimmed.starts_with('[') {
            let (key, value) = parse_header_line(trimmed)?;
            headers.insert(key, value);
        } else {
            movetext_lines.push(trimmed);
        }
    }

    let initial_state = match headers.get("FEN") {
        Some(fen) => GameState::from_fen(fen).map_err(|err| ChessErrors::InvalidPgn(err.to_string()))?,
        None if headers.get("SetUp").map(String::as_str) == Some("1") => {
            return Err(ChessErrors::InvalidPgn(
                "SetUp is present but the FEN tag is missing".to_owned(),
            ));
        }
        None => GameState::new_game(),
    };

    let mut state = initial_state.clone();
    let mut moves = Vec::<ChessMove>::new();
    let mut result = "*".to_owned();

    let movetext = strip_comments_and_variations(&movetext_lines.join(" "));
    for raw in movetext.split_whitespace() {
        let token = strip_move_number(raw);
        if token.is_empty() || token.starts_with('$') {
            continue;
        }
        if is_result_token(token) {
            result = token.to_owned();
            break;
        }

        let legal = LegalMoveGenerator.generate_legal_moves(&state)?;
        let generated = resolve_token(&legal, token)
            .ok_or_else(|| ChessErrors::InvalidPgn(format!("cannot play '{token}' in {}", state.get_fen())))?;
        moves.push(generated.mv);
        state = generated.game_after_move.clone();
    }

    if let Some(header_result) = headers.get("Result") {
        if is_result_token(header_result) {
            result = header_result.clone();
        }
    }

    Ok(PgnGame {
        headers,
        initial_state,
        moves,
        final_state: state,
        result,
    })
}

fn resolve_token<'a>(legal: &'a [GeneratedMove], token: &str) -> Option<&'a GeneratedMove> {
    san_to_move(legal, token).or_else(|| {
        let cleaned = token.trim_end_matches(['+', '#', '!', '?']);
        parse_long_algebraic(cleaned)
            .ok()
            .and_then(|request| find_requested_move(legal, request))
    })
}

fn push_header(out: &mut String, key: &str, value: &str) {
    out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
}

fn wrap_tokens(tokens: &[String]) -> String {
    let mut out = String::new();
    let mut line_len = 0usize;
    for token in tokens {
        if line_len > 0 && line_len + 1 + token.len() > MAX_LINE_WIDTH {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(token);
        line_len += token.len();
    }
    out
}

fn parse_header_line(line: &str) -> Result<(String, String), ChessErrors> {
    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| ChessErrors::InvalidPgn(format!("invalid header line: {line}")))?;
    let (key, value_raw) = inner
        .split_once(' ')
        .ok_or_else(|| ChessErrors::InvalidPgn(format!("header without value: {line}")))?;
    let value = value_raw
        .trim()
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| ChessErrors::InvalidPgn(format!("unquoted header value: {line}")))?;
    Ok((key.trim().to_owned(), value.replace("\\\"", "\"")))
}

fn strip_comments_and_variations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut brace_depth = 0usize;
    let mut paren_depth = 0usize;

    for ch in text.chars() {
        match ch {
            '{' => brace_depth = brace_depth.saturating_add(1),
            '}' => {
                brace_depth = brace_depth.saturating_sub(1);
                out.push(' ');
            }
            '(' if brace_depth == 0 => paren_depth = paren_depth.saturating_add(1),
            ')' if brace_depth == 0 => {
                paren_depth = paren_depth.saturating_sub(1);
                out.push(' ');
            }
            _ if brace_depth == 0 && paren_depth == 0 => out.push(ch),
            _ => {}
        }
    }

    out
}

/// Drop a leading `12.` or `12...` so `12.e4` and `12. e4` read the same.
fn strip_move_number(token: &str) -> &str {
    let digits = token.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return token;
    }
    let rest = &token[digits..];
    if rest.starts_with('.') {
        rest.trim_start_matches('.')
    } else {
        token
    }
}

fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

fn normalize_result(result: &str) -> &str {
    if is_result_token(result) {
        result
    } else {
        "*"
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('"', "\\\"")
}
