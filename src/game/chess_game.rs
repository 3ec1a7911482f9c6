//! Game state machine.
//!
//! `ChessGame` owns the position timeline (initial position, move history,
//! current position and the keys needed for repetition detection) together
//! with the coaching layer attached to it. Every transition validates first
//! and commits last, so a failed call leaves the game exactly as it was.

use std::sync::Arc;

use log::{debug, warn};
use rand::Rng;

use crate::analysis::analysis::Analysis;
use crate::analysis::analysis_cache::{lock_cache, AnalysisCache, SharedAnalysisCache};
use crate::analysis::analysis_worker::{AnalysisOutcome, AnalysisRequest, AnalysisResult};
use crate::analysis::analyzer::Analyzer;
use crate::coach::mood::CoachState;
use crate::config::CoachConfig;
use crate::engines::engine_trait::Engine;
use crate::errors::ChessErrors;
use crate::game::game_status::GameStatus;
use crate::game::move_record::MoveRecord;
use crate::game::snapshot::{CapturedPieces, GameSnapshot};
use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};
use crate::moves::chess_move::ChessMove;
use crate::utils::algebraic::square_to_algebraic;
use crate::utils::long_algebraic::{find_requested_move, parse_long_algebraic, MoveRequest};
use crate::utils::pgn::{read_pgn, write_pgn, PgnTags};
use crate::utils::san::{move_to_san, san_to_move};

/// Positions of one game from its initial position to the current one.
#[derive(Debug, Clone)]
struct Timeline {
    initial: GameState,
    current: GameState,
    history: Vec<MoveRecord>,
    // Zobrist key of every position so far, initial included.
    position_keys: Vec<u64>,
    legal_moves: Vec<GeneratedMove>,
    status: GameStatus,
}

impl Timeline {
    fn start(initial: GameState) -> Result<Self, ChessErrors> {
        let legal_moves = LegalMoveGenerator.generate_legal_moves(&initial)?;
        let status = GameStatus::classify(&initial, legal_moves.len(), 1);
        Ok(Self {
            current: initial.clone(),
            position_keys: vec![initial.zobrist_key],
            initial,
            history: Vec::new(),
            legal_moves,
            status,
        })
    }

    /// Rebuild positions by replaying `history` from `initial`, keeping the
    /// records themselves.
    fn replay(initial: GameState, history: Vec<MoveRecord>) -> Result<Self, ChessErrors> {
        let mut current = initial.clone();
        let mut position_keys = Vec::with_capacity(history.len() + 1);
        position_keys.push(initial.zobrist_key);
        for record in &history {
            current = apply_move(&current, record.mv)?;
            position_keys.push(current.zobrist_key);
        }

        let legal_moves = LegalMoveGenerator.generate_legal_moves(&current)?;
        let occurrences = count_occurrences(&position_keys, current.zobrist_key);
        let status = GameStatus::classify(&current, legal_moves.len(), occurrences);
        Ok(Self {
            initial,
            current,
            history,
            position_keys,
            legal_moves,
            status,
        })
    }

    fn play(&mut self, generated: &GeneratedMove) -> Result<&MoveRecord, ChessErrors> {
        let san = move_to_san(generated, &self.legal_moves)?;
        let next = generated.game_after_move.clone();
        let next_legal = LegalMoveGenerator.generate_legal_moves(&next)?;
        let occurrences = count_occurrences(&self.position_keys, next.zobrist_key) + 1;
        let next_status = GameStatus::classify(&next, next_legal.len(), occurrences);

        let record = MoveRecord {
            mv: generated.mv,
            mover: self.current.side_to_move,
            lan: generated.mv.to_long_algebraic(),
            san,
            fen_after: next.get_fen(),
            timestamp: chrono::Utc::now(),
            evaluation: None,
            quality: None,
        };

        self.position_keys.push(next.zobrist_key);
        self.current = next;
        self.legal_moves = next_legal;
        self.status = next_status;
        self.history.push(record);
        Ok(&self.history[self.history.len() - 1])
    }

    fn ensure_active(&self) -> Result<(), ChessErrors> {
        match self.status {
            GameStatus::Active => Ok(()),
            GameStatus::GameOver(reason) => Err(ChessErrors::GameOver(reason.to_string())),
        }
    }
}

fn square_name(square: Square) -> String {
    square_to_algebraic(square).unwrap_or_else(|_| format!("#{square}"))
}

fn count_occurrences(keys: &[u64], key: u64) -> usize {
    keys.iter().filter(|k| **k == key).count()
}

#[derive(Debug)]
pub struct ChessGame {
    timeline: Timeline,
    analyzer: Analyzer,
    cache: SharedAnalysisCache,
    coach: CoachState,
    config: CoachConfig,
}

impl ChessGame {
    /// A game from the standard starting position with default settings.
    pub fn new() -> Self {
        let config = CoachConfig::default();
        Self {
            timeline: start_position_timeline(),
            analyzer: Analyzer::from_config(&config),
            cache: AnalysisCache::new_shared(config.cache_capacity),
            coach: CoachState::new(config.comment_history_len),
            config,
        }
    }

    pub fn with_config(config: CoachConfig) -> Result<Self, ChessErrors> {
        config.validate()?;
        Ok(Self {
            timeline: Timeline::start(GameState::new_game())?,
            analyzer: Analyzer::from_config(&config),
            cache: AnalysisCache::new_shared(config.cache_capacity),
            coach: CoachState::new(config.comment_history_len),
            config,
        })
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessErrors> {
        let mut game = Self::new();
        game.load_position(fen)?;
        Ok(game)
    }

    // ---- transitions ----

    /// Play the move `from` -> `to`. A pawn reaching the last rank without a
    /// promotion piece becomes a queen.
    pub fn make_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<&MoveRecord, ChessErrors> {
        self.play_request(MoveRequest { from, to, promotion })
    }

    pub fn make_move_lan(&mut self, lan: &str) -> Result<&MoveRecord, ChessErrors> {
        self.timeline.ensure_active()?;
        let request = parse_long_algebraic(lan)?;
        self.play_request(request)
    }

    pub fn make_move_san(&mut self, san: &str) -> Result<&MoveRecord, ChessErrors> {
        self.timeline.ensure_active()?;
        let generated = san_to_move(&self.timeline.legal_moves, san)
            .cloned()
            .ok_or_else(|| ChessErrors::IllegalMove(san.to_owned()))?;
        self.play_generated(&generated)
    }

    /// Take back the last move.
    pub fn undo(&mut self) -> Result<MoveRecord, ChessErrors> {
        let mut history = self.timeline.history.clone();
        let undone = history.pop().ok_or(ChessErrors::EmptyHistory)?;
        self.timeline = Timeline::replay(self.timeline.initial.clone(), history)?;
        debug!("undid {} ({})", undone.san, undone.lan);
        Ok(undone)
    }

    /// Take back moves until `player` is to move again, so against an
    /// opponent both the reply and the player's own move go. Returns the
    /// undone records, most recent first.
    pub fn undo_turn(&mut self, player: Color) -> Result<Vec<MoveRecord>, ChessErrors> {
        let mut history = self.timeline.history.clone();
        let mut undone = vec![history.pop().ok_or(ChessErrors::EmptyHistory)?];
        while let Some(last) = undone.last() {
            if last.mover == player {
                break;
            }
            match history.pop() {
                Some(record) => undone.push(record),
                None => break,
            }
        }
        self.timeline = Timeline::replay(self.timeline.initial.clone(), history)?;
        debug!("undid {} plies back to {player:?}", undone.len());
        Ok(undone)
    }

    /// Back to the standard starting position with an empty history and
    /// cache.
    pub fn reset(&mut self) {
        self.timeline = start_position_timeline();
        self.coach.reset();
        lock_cache(&self.cache).clear();
        debug!("game reset");
    }

    /// Start over from `fen`. On error the game is left untouched.
    pub fn load_position(&mut self, fen: &str) -> Result<(), ChessErrors> {
        let initial = GameState::from_fen(fen)?;
        self.timeline = Timeline::start(initial)?;
        self.coach.reset();
        lock_cache(&self.cache).clear();
        debug!("loaded position {fen}");
        Ok(())
    }

    /// Replace the game with the one described by `pgn`.
    pub fn load_pgn(&mut self, pgn: &str) -> Result<(), ChessErrors> {
        let parsed = read_pgn(pgn)?;
        let mut timeline = Timeline::start(parsed.initial_state)?;
        for mv in parsed.moves {
            let generated = timeline
                .legal_moves
                .iter()
                .find(|generated| generated.mv == mv)
                .cloned()
                .ok_or_else(|| ChessErrors::InvalidPgn(format!("move {mv} cannot be replayed")))?;
            timeline.play(&generated)?;
        }
        debug!("loaded PGN game of {} plies", timeline.history.len());

        self.timeline = timeline;
        self.coach.reset();
        lock_cache(&self.cache).clear();
        Ok(())
    }

    pub fn export_pgn(&self, tags: &PgnTags) -> Result<String, ChessErrors> {
        let moves: Vec<ChessMove> = self.timeline.history.iter().map(|r| r.mv).collect();
        write_pgn(&self.timeline.initial, &moves, tags, self.timeline.status.result_token())
    }

    /// Let `engine` choose and play a move for the side to move.
    pub fn play_engine_move(&mut self, engine: &mut dyn Engine) -> Result<Option<&MoveRecord>, ChessErrors> {
        self.timeline.ensure_active()?;
        let Some(mv) = engine.choose_move(&self.timeline.current)? else {
            return Ok(None);
        };
        let generated = self
            .timeline
            .legal_moves
            .iter()
            .find(|generated| generated.mv == mv)
            .cloned()
            .ok_or_else(|| ChessErrors::IllegalMove(format!("{} chose {mv}", engine.name())))?;
        self.play_generated(&generated).map(Some)
    }

    fn play_request(&mut self, request: MoveRequest) -> Result<&MoveRecord, ChessErrors> {
        self.timeline.ensure_active()?;
        let generated = find_requested_move(&self.timeline.legal_moves, request)
            .cloned()
            .ok_or_else(|| {
                let mut lan = format!("{}{}", square_name(request.from), square_name(request.to));
                if let Some(kind) = request.promotion {
                    lan.push(kind.to_char());
                }
                ChessErrors::IllegalMove(lan)
            })?;
        self.play_generated(&generated)
    }

    fn play_generated(&mut self, generated: &GeneratedMove) -> Result<&MoveRecord, ChessErrors> {
        let record = self.timeline.play(generated)?;
        debug!("played {} ({})", record.san, record.lan);
        Ok(record)
    }

    // ---- queries ----

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.timeline.status
    }

    #[inline]
    pub fn game_state(&self) -> &GameState {
        &self.timeline.current
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.timeline.current.side_to_move
    }

    #[inline]
    pub fn fen(&self) -> String {
        self.timeline.current.get_fen()
    }

    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        &self.timeline.history
    }

    /// Half-moves played since the initial position.
    #[inline]
    pub fn ply(&self) -> usize {
        self.timeline.history.len()
    }

    #[inline]
    pub fn legal_moves(&self) -> &[GeneratedMove] {
        &self.timeline.legal_moves
    }

    /// Target squares of the legal moves starting on `square`.
    pub fn legal_destinations(&self, square: Square) -> Vec<Square> {
        let mut out: Vec<Square> = self
            .timeline
            .legal_moves
            .iter()
            .filter(|generated| generated.mv.from == square)
            .map(|generated| generated.mv.to)
            .collect();
        // Promotions list the same target four times.
        out.dedup();
        out
    }

    pub fn is_valid_move(&self, from: Square, to: Square) -> bool {
        self.timeline
            .legal_moves
            .iter()
            .any(|generated| generated.mv.from == from && generated.mv.to == to)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.timeline.current.piece_at(square)
    }

    #[inline]
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        self.timeline.current.is_square_attacked(square, by)
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.timeline.current.in_check()
    }

    pub fn captured_pieces(&self) -> CapturedPieces {
        CapturedPieces::from_history(&self.timeline.history)
    }

    pub fn snapshot(&self) -> Result<GameSnapshot, ChessErrors> {
        let legal = &self.timeline.legal_moves;
        let legal_san = legal
            .iter()
            .map(|generated| move_to_san(generated, legal))
            .collect::<Result<Vec<_>, _>>()?;
        let status = self.timeline.status;

        Ok(GameSnapshot {
            fen: self.fen(),
            side_to_move: self.side_to_move(),
            status,
            is_game_over: status.is_game_over(),
            in_check: self.in_check(),
            is_checkmate: status.is_checkmate(),
            is_stalemate: status.is_stalemate(),
            is_draw: status.draw_reason().is_some(),
            draw_reason: status.draw_reason(),
            legal_moves: legal_san,
            history: self.timeline.history.clone(),
            captured: self.captured_pieces(),
        })
    }

    // ---- coaching ----

    #[inline]
    pub fn coach(&self) -> &CoachState {
        &self.coach
    }

    #[inline]
    pub fn config(&self) -> &CoachConfig {
        &self.config
    }

    #[inline]
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Handle on the analysis cache for a background worker.
    #[inline]
    pub fn shared_cache(&self) -> SharedAnalysisCache {
        Arc::clone(&self.cache)
    }

    /// Analyse the current position now, through the cache, and let the
    /// coach react to it.
    pub fn analyze<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Arc<Analysis>, ChessErrors> {
        let fen = self.fen();
        let analysis = {
            let mut cache = lock_cache(&self.cache);
            let current = &self.timeline.current;
            let ply = self.timeline.history.len();
            let analyzer = &self.analyzer;
            cache.get_or_compute(&fen, || analyzer.analyze(current, ply, rng))?
        };
        self.attach(&analysis);
        Ok(analysis)
    }

    /// Request describing the current position, for `AnalysisWorker::submit`.
    pub fn request_analysis(&self) -> AnalysisRequest {
        AnalysisRequest {
            fen: self.fen(),
            ply: self.ply(),
            epoch: lock_cache(&self.cache).epoch(),
        }
    }

    /// Apply a worker result if it still describes the current position.
    pub fn accept_analysis(&mut self, result: AnalysisResult) -> Result<Arc<Analysis>, ChessErrors> {
        let fen = result.request.fen;
        let analysis = match result.outcome {
            AnalysisOutcome::Ready(analysis) => analysis,
            AnalysisOutcome::Stale => return Err(ChessErrors::AnalysisStale { fen }),
            AnalysisOutcome::Failed(err) => return Err(err),
        };

        let epoch = lock_cache(&self.cache).epoch();
        if fen != self.fen() || result.request.epoch != epoch {
            warn!("discarding stale analysis for {fen}");
            return Err(ChessErrors::AnalysisStale { fen });
        }

        self.attach(&analysis);
        Ok(analysis)
    }

    fn attach(&mut self, analysis: &Analysis) {
        let last_san = match self.timeline.history.last_mut() {
            // Already commented on; a cache hit must not repeat it.
            Some(record) if record.evaluation.is_some() => None,
            Some(record) if record.fen_after == analysis.fen => {
                record.evaluation = Some(analysis.evaluation);
                record.quality = Some(analysis.move_quality);
                Some(record.san.clone())
            }
            _ => None,
        };
        // The coach only comments on moves, not on a freshly loaded position.
        if last_san.is_some() {
            self.coach.observe(analysis, last_san.as_deref());
        }
    }
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

fn start_position_timeline() -> Timeline {
    let initial = GameState::new_game();
    let legal_moves = LegalMoveGenerator
        .generate_legal_moves(&initial)
        .unwrap_or_default();
    Timeline {
        current: initial.clone(),
        position_keys: vec![initial.zobrist_key],
        initial,
        history: Vec::new(),
        legal_moves,
        status: GameStatus::Active,
    }
}
