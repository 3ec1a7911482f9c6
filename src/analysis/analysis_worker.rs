//! Background analysis on a dedicated thread.
//!
//! Requests go in over one channel and results come back over another. The
//! worker handles one request at a time; when it picks up work it drains the
//! queue and keeps only the newest request, since older positions are
//! already out of date. A request stamped with an epoch other than the
//! cache's current one is answered as stale without computing anything.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::analysis::analysis::Analysis;
use crate::analysis::analysis_cache::{lock_cache, SharedAnalysisCache};
use crate::analysis::analyzer::Analyzer;
use crate::errors::ChessErrors;
use crate::game_state::game_state::GameState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub fen: String,
    /// Half-moves played before this position.
    pub ply: usize,
    /// Cache epoch the request was issued under.
    pub epoch: u64,
}

#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Ready(Arc<Analysis>),
    /// The cache was cleared after the request was issued.
    Stale,
    Failed(ChessErrors),
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub request: AnalysisRequest,
    pub outcome: AnalysisOutcome,
    /// Queued requests dropped in favour of this one.
    pub superseded: usize,
}

pub struct AnalysisWorker {
    requests: Option<Sender<AnalysisRequest>>,
    results: Receiver<AnalysisResult>,
    handle: Option<JoinHandle<()>>,
}

impl AnalysisWorker {
    pub fn spawn(analyzer: Analyzer, cache: SharedAnalysisCache) -> Self {
        Self::spawn_with_rng(analyzer, cache, StdRng::from_os_rng())
    }

    /// Spawn with a fixed seed so commentary choices are reproducible.
    pub fn spawn_seeded(analyzer: Analyzer, cache: SharedAnalysisCache, seed: u64) -> Self {
        Self::spawn_with_rng(analyzer, cache, StdRng::seed_from_u64(seed))
    }

    fn spawn_with_rng(analyzer: Analyzer, cache: SharedAnalysisCache, rng: StdRng) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<AnalysisRequest>();
        let (result_tx, result_rx) = mpsc::channel::<AnalysisResult>();

        let handle = thread::spawn(move || {
            run_worker(&analyzer, &cache, rng, &request_rx, &result_tx);
        });

        Self {
            requests: Some(request_tx),
            results: result_rx,
            handle: Some(handle),
        }
    }

    pub fn submit(&self, request: AnalysisRequest) -> Result<(), ChessErrors> {
        let sender = self.requests.as_ref().ok_or(ChessErrors::WorkerUnavailable)?;
        sender.send(request).map_err(|_| ChessErrors::WorkerUnavailable)
    }

    /// Non-blocking poll for a finished result.
    pub fn try_recv(&self) -> Option<AnalysisResult> {
        self.results.try_recv().ok()
    }

    /// Wait up to `timeout` for a result. `Ok(None)` means nothing arrived
    /// in time.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<AnalysisResult>, ChessErrors> {
        match self.results.recv_timeout(timeout) {
            Ok(result) => Ok(Some(result)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(ChessErrors::WorkerUnavailable),
        }
    }
}

impl Drop for AnalysisWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("analysis worker panicked");
            }
        }
    }
}

fn run_worker(
    analyzer: &Analyzer,
    cache: &SharedAnalysisCache,
    mut rng: StdRng,
    requests: &Receiver<AnalysisRequest>,
    results: &Sender<AnalysisResult>,
) {
    while let Ok(mut request) = requests.recv() {
        let mut superseded = 0usize;
        while let Ok(newer) = requests.try_recv() {
            request = newer;
            superseded += 1;
        }
        if superseded > 0 {
            debug!("analysis worker skipped {superseded} superseded request(s)");
        }

        let outcome = {
            // Held across the compute so a key is never analysed twice.
            let mut cache = lock_cache(cache);
            if cache.epoch() != request.epoch {
                AnalysisOutcome::Stale
            } else {
                let computed = GameState::from_fen(&request.fen).and_then(|game_state| {
                    cache.get_or_compute(&request.fen, || {
                        analyzer.analyze(&game_state, request.ply, &mut rng)
                    })
                });
                match computed {
                    Ok(analysis) => AnalysisOutcome::Ready(analysis),
                    Err(err) => {
                        warn!("analysis of {} failed: {err}", request.fen);
                        AnalysisOutcome::Failed(err)
                    }
                }
            }
        };

        let result = AnalysisResult {
            request,
            outcome,
            superseded,
        };
        if results.send(result).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AnalysisOutcome, AnalysisRequest, AnalysisWorker};
    use crate::analysis::analysis_cache::{lock_cache, AnalysisCache};
    use crate::analysis::analyzer::Analyzer;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::errors::ChessErrors;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(10);

    fn request(fen: &str, epoch: u64) -> AnalysisRequest {
        AnalysisRequest {
            fen: fen.to_owned(),
            ply: 0,
            epoch,
        }
    }

    #[test]
    fn computes_and_caches_a_position() {
        let cache = AnalysisCache::new_shared(16);
        let worker = AnalysisWorker::spawn_seeded(Analyzer::default(), cache.clone(), 5);
        worker.submit(request(STARTING_POSITION_FEN, 0)).expect("submit");

        let result = worker.recv_timeout(WAIT).expect("worker alive").expect("result");
        match result.outcome {
            AnalysisOutcome::Ready(analysis) => assert_eq!(analysis.evaluation, 0.0),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(lock_cache(&cache).contains(STARTING_POSITION_FEN));
    }

    #[test]
    fn requests_from_an_old_epoch_are_stale() {
        let cache = AnalysisCache::new_shared(16);
        lock_cache(&cache).clear();
        let worker = AnalysisWorker::spawn_seeded(Analyzer::default(), cache.clone(), 5);
        worker.submit(request(STARTING_POSITION_FEN, 0)).expect("submit");

        let result = worker.recv_timeout(WAIT).expect("worker alive").expect("result");
        assert!(matches!(result.outcome, AnalysisOutcome::Stale));
        assert!(lock_cache(&cache).is_empty());
    }

    #[test]
    fn invalid_fen_fails_without_caching() {
        let cache = AnalysisCache::new_shared(16);
        let worker = AnalysisWorker::spawn_seeded(Analyzer::default(), cache.clone(), 5);
        worker.submit(request("garbage", 0)).expect("submit");

        let result = worker.recv_timeout(WAIT).expect("worker alive").expect("result");
        assert!(matches!(
            result.outcome,
            AnalysisOutcome::Failed(ChessErrors::InvalidPosition(_))
        ));
        assert!(lock_cache(&cache).is_empty());
    }

    #[test]
    fn the_newest_request_is_always_answered() {
        let cache = AnalysisCache::new_shared(64);
        let worker = AnalysisWorker::spawn_seeded(Analyzer::default(), cache, 5);
        let fens = [
            STARTING_POSITION_FEN,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
        ];
        for fen in fens {
            worker.submit(request(fen, 0)).expect("submit");
        }

        let mut answered = Vec::new();
        let mut superseded = 0;
        while answered.last() != Some(&fens[2].to_owned()) {
            let result = worker.recv_timeout(WAIT).expect("worker alive").expect("result");
            superseded += result.superseded;
            answered.push(result.request.fen);
        }
        assert_eq!(answered.len() + superseded, fens.len());
    }
}
