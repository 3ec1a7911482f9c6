//! Line-oriented coach REPL.
//!
//! Reads moves (long algebraic or SAN) and commands from stdin, plays them,
//! and prints the board with the coach's reaction. With `--ai` the random
//! opponent answers every move.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use log::{info, warn};

use coach_chess::analysis::analysis::Analysis;
use coach_chess::analysis::analysis_worker::AnalysisWorker;
use coach_chess::config::CoachConfig;
use coach_chess::engines::engine_random::RandomEngine;
use coach_chess::engines::engine_trait::Engine;
use coach_chess::errors::ChessErrors;
use coach_chess::game::chess_game::ChessGame;
use coach_chess::game::game_status::GameStatus;
use coach_chess::utils::pgn::PgnTags;
use coach_chess::utils::render_game_state::render_game_state;

const ANALYSIS_WAIT: Duration = Duration::from_secs(5);

const HELP: &str = "commands: <move> (e2e4 or Nf3) | undo | reset | fen [<FEN>] | pgn | help | quit";

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut config = CoachConfig::default();
    let mut vs_ai = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--ai" => vs_ai = true,
            "--config" => match args.next().map(|path| load_config(&path)) {
                Some(Ok(loaded)) => config = loaded,
                Some(Err(err)) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
                None => {
                    eprintln!("--config needs a path");
                    std::process::exit(2);
                }
            },
            other => warn!("ignoring unknown argument {other}"),
        }
    }

    let mut game = match ChessGame::with_config(config.clone()) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    let worker = AnalysisWorker::spawn(game.analyzer().clone(), game.shared_cache());
    let mut opponent = RandomEngine::new(config.capture_preference);
    let mut player = game.side_to_move();
    info!("coach started (vs_ai = {vs_ai})");

    println!("{}\n{}\n{}", render_game_state(game.game_state()), game.coach().last_comment, HELP);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let outcome = match input {
            "quit" | "exit" => break,
            "help" => {
                println!("{HELP}");
                Ok(())
            }
            "undo" if vs_ai => game.undo_turn(player).map(|records| {
                for record in records {
                    println!("took back {}", record.san);
                }
            }),
            "undo" => game.undo().map(|record| println!("took back {}", record.san)),
            "reset" => {
                game.reset();
                opponent.new_game();
                player = game.side_to_move();
                Ok(())
            }
            "fen" => {
                println!("{}", game.fen());
                Ok(())
            }
            "pgn" => game.export_pgn(&PgnTags::default()).map(|pgn| print!("{pgn}")),
            _ => match input.strip_prefix("fen ") {
                Some(fen) => game.load_position(fen.trim()).map(|()| {
                    opponent.new_game();
                    player = game.side_to_move();
                }),
                None => {
                    player = game.side_to_move();
                    play_turn(&mut game, &worker, &mut opponent, input, vs_ai)
                }
            },
        };

        if let Err(err) = outcome {
            println!("{err}");
            continue;
        }
        println!("{}", render_game_state(game.game_state()));
        if let GameStatus::GameOver(reason) = game.status() {
            println!("game over: {reason}");
        }
        io::stdout().flush().ok();
    }
}

fn play_turn(
    game: &mut ChessGame,
    worker: &AnalysisWorker,
    opponent: &mut RandomEngine,
    input: &str,
    vs_ai: bool,
) -> Result<(), ChessErrors> {
    let as_lan = game.make_move_lan(input).map(|record| record.san.clone());
    let san = match as_lan {
        Ok(san) => san,
        Err(ChessErrors::InvalidAlgebraic(_)) => game.make_move_san(input)?.san.clone(),
        Err(err) => return Err(err),
    };
    println!("played {san}");
    coach_reaction(game, worker);

    if vs_ai && !game.status().is_game_over() {
        if let Some(record) = game.play_engine_move(opponent)? {
            println!("opponent played {}", record.san);
        }
    }
    Ok(())
}

/// Ask the worker for an analysis of the current position and print it if
/// it is still current when it arrives.
fn coach_reaction(game: &mut ChessGame, worker: &AnalysisWorker) {
    if let Err(err) = worker.submit(game.request_analysis()) {
        warn!("{err}");
        return;
    }
    let result = match worker.recv_timeout(ANALYSIS_WAIT) {
        Ok(Some(result)) => result,
        Ok(None) => {
            warn!("analysis timed out");
            return;
        }
        Err(err) => {
            warn!("{err}");
            return;
        }
    };
    match game.accept_analysis(result) {
        Ok(analysis) => print_analysis(game, &analysis),
        Err(err) => warn!("{err}"),
    }
}

fn print_analysis(game: &ChessGame, analysis: &Analysis) {
    println!(
        "[{}] eval {:+.1} ({})  {}",
        game.coach().mood.as_str(),
        analysis.evaluation,
        analysis.move_quality,
        analysis.commentary
    );
    if let Some(best) = &analysis.best_move {
        println!("  best reply: {best}");
    }
    for line in analysis.threats.iter().chain(&analysis.suggestions) {
        println!("  {line}");
    }
}

fn load_config(path: &str) -> Result<CoachConfig, ChessErrors> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| ChessErrors::InvalidConfig(format!("{path}: {err}")))?;
    CoachConfig::from_json_str(&text)
}
