//! Crate root module declarations for the Coach Chess rules engine.
//!
//! The rules core (board model, move generation, game state machine) sits
//! underneath a small coaching layer (evaluation, analysis cache, templated
//! commentary, coach mood). Binaries, tests and benches import the stable
//! module paths declared here.

pub mod config;
pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod zobrist;
}

pub mod moves {
    pub mod attacks;
    pub mod chess_move;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_king;
    pub mod legal_moves_pawn;
    pub mod legal_moves_pieces;
    pub mod move_generator;
    pub mod perft;
}

pub mod game {
    pub mod chess_game;
    pub mod game_status;
    pub mod move_record;
    pub mod snapshot;
}

pub mod analysis {
    pub mod analysis;
    pub mod analysis_cache;
    pub mod analysis_worker;
    pub mod analyzer;
    pub mod commentary;
    pub mod evaluator;
    pub mod move_quality;
}

pub mod coach {
    pub mod mood;
}

pub mod engines {
    pub mod engine_random;
    pub mod engine_trait;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod pgn;
    pub mod render_game_state;
    pub mod san;
}
