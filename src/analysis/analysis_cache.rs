//! Bounded least-recently-used cache of analyses keyed by FEN.
//!
//! Entries are handed out as `Arc<Analysis>` and never replaced while
//! cached: a key is computed at most once until it is evicted or the cache
//! is cleared. Every `clear` advances the epoch so work started against the
//! old contents can be recognised as stale.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::trace;

use crate::analysis::analysis::Analysis;
use crate::errors::ChessErrors;

pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Cache shared between a game and its background analysis worker.
pub type SharedAnalysisCache = Arc<Mutex<AnalysisCache>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    analysis: Arc<Analysis>,
    last_used: u64,
}

#[derive(Debug, Clone)]
pub struct AnalysisCache {
    entries: HashMap<String, CacheEntry>,
    // last_used tick -> key, oldest first
    recency: BTreeMap<u64, String>,
    capacity: usize,
    tick: u64,
    epoch: u64,
    stats: CacheStats,
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl AnalysisCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY)),
            recency: BTreeMap::new(),
            capacity,
            tick: 0,
            epoch: 0,
            stats: CacheStats::default(),
        }
    }

    pub fn new_shared(capacity: usize) -> SharedAnalysisCache {
        Arc::new(Mutex::new(Self::new(capacity)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    #[inline]
    pub fn contains(&self, fen: &str) -> bool {
        self.entries.contains_key(fen)
    }

    /// Look up `fen`, marking it most recently used on a hit.
    pub fn get(&mut self, fen: &str) -> Option<Arc<Analysis>> {
        let tick = self.next_tick();
        match self.entries.get_mut(fen) {
            Some(entry) => {
                self.recency.remove(&entry.last_used);
                entry.last_used = tick;
                self.recency.insert(tick, fen.to_owned());
                self.stats.hits += 1;
                trace!("analysis cache hit for {fen}");
                Some(Arc::clone(&entry.analysis))
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Return the cached analysis for `fen`, or run `compute` once and cache
    /// its result. A failed computation caches nothing.
    pub fn get_or_compute<F>(&mut self, fen: &str, compute: F) -> Result<Arc<Analysis>, ChessErrors>
    where
        F: FnOnce() -> Result<Analysis, ChessErrors>,
    {
        if let Some(hit) = self.get(fen) {
            return Ok(hit);
        }
        let analysis = Arc::new(compute()?);
        self.insert_arc(fen, Arc::clone(&analysis));
        Ok(analysis)
    }

    /// Cache `analysis` under `fen` unless the key is already present, in
    /// which case the existing entry wins and is returned.
    pub fn insert(&mut self, fen: &str, analysis: Analysis) -> Arc<Analysis> {
        if let Some(existing) = self.get(fen) {
            return existing;
        }
        let analysis = Arc::new(analysis);
        self.insert_arc(fen, Arc::clone(&analysis));
        analysis
    }

    /// Drop every entry and advance the epoch.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    fn insert_arc(&mut self, fen: &str, analysis: Arc<Analysis>) {
        while self.entries.len() >= self.capacity {
            let Some((_, oldest)) = self.recency.pop_first() else {
                break;
            };
            self.entries.remove(&oldest);
            self.stats.evictions += 1;
        }

        let tick = self.next_tick();
        self.recency.insert(tick, fen.to_owned());
        self.entries.insert(
            fen.to_owned(),
            CacheEntry {
                analysis,
                last_used: tick,
            },
        );
        self.stats.inserts += 1;
    }

    #[inline]
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// Lock a shared cache. A panic in another holder leaves the cache itself
/// consistent, so a poisoned lock is recovered rather than propagated.
pub fn lock_cache(cache: &SharedAnalysisCache) -> MutexGuard<'_, AnalysisCache> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::{lock_cache, AnalysisCache, CacheStats};
    use crate::analysis::analysis::Analysis;
    use crate::analysis::move_quality::MoveQuality;
    use crate::errors::ChessErrors;
    use std::sync::Arc;

    fn sample(fen: &str, evaluation: f64) -> Analysis {
        Analysis {
            fen: fen.to_owned(),
            evaluation,
            best_move: None,
            principal_variation: Vec::new(),
            depth: 15,
            commentary: String::new(),
            move_quality: MoveQuality::Good,
            threats: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    #[test]
    fn computes_each_key_once() {
        let mut cache = AnalysisCache::new(8);
        let mut calls = 0;
        let first = cache
            .get_or_compute("a", || {
                calls += 1;
                Ok(sample("a", 1.0))
            })
            .expect("compute");
        let second = cache
            .get_or_compute("a", || -> Result<Analysis, ChessErrors> {
                panic!("cached key must not be recomputed")
            })
            .expect("hit");

        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            cache.stats(),
            CacheStats { hits: 1, misses: 1, inserts: 1, evictions: 0 }
        );
    }

    #[test]
    fn failed_compute_leaves_nothing_behind() {
        let mut cache = AnalysisCache::new(8);
        let result = cache.get_or_compute("a", || Err(ChessErrors::WorkerUnavailable));
        assert_eq!(result, Err(ChessErrors::WorkerUnavailable));
        assert!(cache.is_empty());
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = AnalysisCache::new(2);
        cache.insert("a", sample("a", 0.0));
        cache.insert("b", sample("b", 0.0));
        assert!(cache.get("a").is_some());
        cache.insert("c", sample("c", 0.0));

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn insert_never_replaces_an_existing_entry() {
        let mut cache = AnalysisCache::new(4);
        cache.insert("a", sample("a", 1.0));
        let kept = cache.insert("a", sample("a", -1.0));
        assert_eq!(kept.evaluation, 1.0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_empties_and_advances_epoch() {
        let shared = AnalysisCache::new_shared(4);
        {
            let mut cache = lock_cache(&shared);
            cache.insert("a", sample("a", 0.0));
            assert_eq!(cache.epoch(), 0);
            cache.clear();
        }
        let cache = lock_cache(&shared);
        assert!(cache.is_empty());
        assert_eq!(cache.epoch(), 1);
    }
}
