use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use coach_chess::analysis::analysis_cache::AnalysisCache;
use coach_chess::analysis::analysis_worker::AnalysisWorker;
use coach_chess::analysis::analyzer::Analyzer;
use coach_chess::analysis::evaluator::{MaterialEvaluator, PositionScorer};
use coach_chess::coach::mood::CoachMood;
use coach_chess::config::CoachConfig;
use coach_chess::engines::engine_random::RandomEngine;
use coach_chess::errors::ChessErrors;
use coach_chess::game::chess_game::ChessGame;
use coach_chess::game::game_status::{DrawReason, GameOverReason, GameStatus};
use coach_chess::game_state::chess_rules::STARTING_POSITION_FEN;
use coach_chess::game_state::chess_types::Color;
use coach_chess::game_state::game_state::GameState;

#[derive(Default)]
struct CountingScorer {
    calls: AtomicUsize,
    inner: MaterialEvaluator,
}

impl PositionScorer for CountingScorer {
    fn score(&self, game_state: &GameState, ply: usize) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.score(game_state, ply)
    }
}

#[test]
fn e4_leaves_black_twenty_replies() {
    let mut game = ChessGame::new();
    game.make_move_lan("e2e4").expect("e2e4 is legal");

    let snapshot = game.snapshot().expect("snapshot");
    assert_eq!(snapshot.legal_moves.len(), 20);
    assert_eq!(snapshot.side_to_move, Color::Dark);
    assert!(!snapshot.in_check);
    assert!(!snapshot.is_game_over);
    assert_eq!(
        snapshot.fen,
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );
}

#[test]
fn fools_mate_ends_the_game() {
    let mut game = ChessGame::new();
    for lan in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        game.make_move_lan(lan).expect("move is legal");
    }

    let snapshot = game.snapshot().expect("snapshot");
    assert!(snapshot.is_checkmate);
    assert!(!snapshot.is_stalemate);
    assert!(snapshot.in_check);
    assert_eq!(snapshot.side_to_move, Color::Light);
    assert!(snapshot.legal_moves.is_empty());
    assert_eq!(
        snapshot.status,
        GameStatus::GameOver(GameOverReason::Checkmate { winner: Color::Dark })
    );
    assert_eq!(game.status().result_token(), "0-1");
}

#[test]
fn cornered_king_is_stalemated() {
    let game = ChessGame::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("FEN");
    let snapshot = game.snapshot().expect("snapshot");
    assert!(snapshot.is_stalemate);
    assert!(!snapshot.is_checkmate);
    assert!(!snapshot.in_check);
    assert!(snapshot.legal_moves.is_empty());
}

#[test]
fn invalid_position_keeps_previous_state() {
    let mut game = ChessGame::new();
    game.make_move_lan("e2e4").expect("legal");
    let before = game.snapshot().expect("snapshot");

    let missing_king = "rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQ - 0 1";
    assert!(matches!(
        game.load_position(missing_king),
        Err(ChessErrors::InvalidPosition(_))
    ));
    assert_eq!(game.snapshot().expect("snapshot"), before);
}

#[test]
fn undo_restores_the_exact_position_string() {
    let mut game = ChessGame::new();
    for lan in ["e2e4", "c7c5", "g1f3", "d7d6", "d2d4", "c5d4", "f3d4", "g8f6", "b1c3", "a7a6"] {
        let before = game.fen();
        let len = game.history().len();
        game.make_move_lan(lan).expect("legal");
        game.undo().expect("history");
        assert_eq!(game.fen(), before);
        assert_eq!(game.history().len(), len);
        game.make_move_lan(lan).expect("legal");
    }
}

#[test]
fn starting_position_evaluates_to_zero() {
    let analyzer = Analyzer::default();
    assert_eq!(analyzer.score(&GameState::new_game(), 0), 0.0);

    let mut game = ChessGame::new();
    let analysis = game.analyze(&mut StdRng::seed_from_u64(4)).expect("analysis");
    assert_eq!(analysis.evaluation, 0.0);
    assert_eq!(analysis.fen, STARTING_POSITION_FEN);
}

#[test]
fn cached_analysis_is_not_recomputed() {
    let scorer = Arc::new(CountingScorer::default());
    let analyzer = Analyzer::default().with_scorer(scorer.clone());
    let mut cache = AnalysisCache::new(16);
    let game = GameState::new_game();
    let mut rng = StdRng::seed_from_u64(1);

    let first = cache
        .get_or_compute(STARTING_POSITION_FEN, || analyzer.analyze(&game, 0, &mut rng))
        .expect("analysis");
    let second = cache
        .get_or_compute(STARTING_POSITION_FEN, || analyzer.analyze(&game, 0, &mut rng))
        .expect("analysis");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn random_playouts_never_leave_the_mover_in_check() {
    for seed in 0..8 {
        let mut game = ChessGame::new();
        let mut engine = RandomEngine::seeded(0.7, seed);
        for _ in 0..120 {
            if game.play_engine_move(&mut engine).is_err() {
                break;
            }
            let state = game.game_state();
            assert!(
                !state.is_square_attacked(
                    state.king_square(state.side_to_move.opposite()).expect("king"),
                    state.side_to_move
                ),
                "side not to move is in check after {:?}",
                game.history().last().map(|r| &r.lan)
            );
            let fen = game.fen();
            assert_eq!(GameState::from_fen(&fen).expect("reachable FEN parses").get_fen(), fen);
        }
    }
}

#[test]
fn fifty_quiet_moves_draw() {
    let mut game = ChessGame::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").expect("FEN");
    game.make_move_lan("a1a2").expect("legal");
    assert_eq!(game.status().draw_reason(), Some(DrawReason::FiftyMoveRule));
    assert!(matches!(game.make_move_lan("e8d8"), Err(ChessErrors::GameOver(_))));
}

#[test]
fn bare_kings_are_a_draw() {
    let mut game = ChessGame::from_fen("4k3/8/8/8/8/8/3q4/4K3 w - - 0 1").expect("FEN");
    game.make_move_lan("e1d2").expect("king takes queen");
    assert_eq!(game.status().draw_reason(), Some(DrawReason::InsufficientMaterial));
    assert_eq!(game.captured_pieces().black.len(), 1);
}

#[test]
fn worker_results_for_old_positions_are_rejected() {
    let mut game = ChessGame::new();
    let worker = AnalysisWorker::spawn_seeded(game.analyzer().clone(), game.shared_cache(), 9);

    game.make_move_lan("e2e4").expect("legal");
    worker.submit(game.request_analysis()).expect("submit");
    let result = worker
        .recv_timeout(Duration::from_secs(10))
        .expect("worker alive")
        .expect("result");

    // The position moved on before the result was accepted.
    game.make_move_lan("e7e5").expect("legal");
    assert!(matches!(
        game.accept_analysis(result),
        Err(ChessErrors::AnalysisStale { .. })
    ));

    worker.submit(game.request_analysis()).expect("submit");
    let result = worker
        .recv_timeout(Duration::from_secs(10))
        .expect("worker alive")
        .expect("result");
    let analysis = game.accept_analysis(result).expect("current");
    assert_eq!(game.history().last().and_then(|r| r.evaluation), Some(analysis.evaluation));
    assert_ne!(game.coach().mood, CoachMood::Neutral);
}

#[test]
fn reset_clears_the_cache_epoch() {
    let mut game = ChessGame::new();
    game.make_move_lan("d2d4").expect("legal");
    let request = game.request_analysis();
    game.analyze(&mut StdRng::seed_from_u64(0)).expect("analysis");

    game.reset();
    assert_eq!(game.fen(), STARTING_POSITION_FEN);
    assert!(game.history().is_empty());
    assert_ne!(game.request_analysis().epoch, request.epoch);
    assert_eq!(game.coach().mood, CoachMood::Neutral);
}

#[test]
fn config_drives_the_coach() {
    let config = CoachConfig::from_json_str(r#"{ "brilliant_probability": 1.0 }"#).expect("config");
    let mut game = ChessGame::with_config(config).expect("game");
    game.make_move_lan("e2e4").expect("legal");
    let analysis = game.analyze(&mut StdRng::seed_from_u64(0)).expect("analysis");
    assert_eq!(analysis.move_quality.as_str(), "brilliant");
    assert_eq!(game.coach().mood, CoachMood::Impressed);
}
