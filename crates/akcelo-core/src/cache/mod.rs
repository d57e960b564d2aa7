//! Query result cache with adaptive expiration and score-based eviction.
//!
//! The cache never serves a stale result: a hit requires the entry to be
//! strictly before its expiration time, expired entries are purged the
//! moment a lookup sees them, and every graph mutation is expected to call
//! [`QueryCache::invalidate_for_mutation`] synchronously. The invalidation
//! policy over-invalidates on purpose - an unnecessary eviction costs one
//! recomputation, a stale hit is wrong output.
//!
//! Get/put run on a sharded map with no global lock. Eviction sweeps take
//! a dedicated sweep-only mutex so at most one sweep is in flight while
//! ordinary traffic keeps making progress.

mod entry;
pub mod key;
pub mod score;
mod sweeper;

pub use key::canonical_key;
pub use score::eviction_score;
pub use sweeper::SweeperStats;

use std::cmp::Ordering as CmpOrdering;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;

use akcelo_common::collections::AkceloConcurrentMap;

use crate::graph::query::{QueryKind, QueryResult, QuerySpec};
use entry::CacheEntry;
use sweeper::CacheSweeper;

/// Adaptive TTL tiers, keyed by historical hit frequency.
const TTL_HOT: Duration = Duration::from_secs(30 * 60); // frequency > 10
const TTL_WARM: Duration = Duration::from_secs(20 * 60); // frequency > 5
const TTL_TEPID: Duration = Duration::from_secs(15 * 60); // frequency > 2

/// Cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries before eviction kicks in.
    pub max_entries: usize,
    /// TTL for keys without enough hit history for an adaptive tier.
    pub default_ttl: Duration,
    /// Cadence of the background maintenance sweep.
    pub sweep_interval: Duration,
    /// Whether caching is enabled at all.
    pub enabled: bool,
    /// Whether to run the background sweeper thread.
    pub background_sweep: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: Duration::from_secs(10 * 60),
            sweep_interval: Duration::from_secs(60),
            enabled: true,
            background_sweep: true,
        }
    }
}

impl CacheConfig {
    /// Sets the maximum entry count.
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Sets the default TTL.
    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sets the background sweep cadence.
    #[must_use]
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Disables the background sweeper thread.
    ///
    /// Sweeps still run inline when a `put` finds the cache at capacity.
    #[must_use]
    pub fn without_background_sweep(mut self) -> Self {
        self.background_sweep = false;
        self
    }

    /// Disables caching entirely - every lookup misses, every put is a
    /// no-op.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// The kind of graph mutation driving an invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// A node was created.
    NodeCreated,
    /// A node's label or properties changed.
    NodeUpdated,
    /// A node was deleted.
    NodeDeleted,
    /// An edge was created.
    EdgeCreated,
    /// An edge's properties changed.
    EdgeUpdated,
    /// An edge was deleted.
    EdgeDeleted,
}

impl MutationKind {
    /// Whether this mutation touches edges rather than nodes.
    #[must_use]
    pub const fn affects_edges(self) -> bool {
        matches!(
            self,
            Self::EdgeCreated | Self::EdgeUpdated | Self::EdgeDeleted
        )
    }
}

/// Per-key lookup history, kept across entry lifetimes.
///
/// The hit count is the "historical frequency" behind adaptive TTLs and
/// eviction scores, so it deliberately survives eviction of the entry
/// itself.
#[derive(Debug, Clone, Copy, Default)]
struct KeyHistory {
    hits: u64,
    misses: u64,
}

/// What one eviction sweep accomplished.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOutcome {
    /// Entries removed because their expiration time had passed.
    pub expired: usize,
    /// Entries evicted by score under capacity pressure.
    pub evicted: usize,
}

/// Shared cache state, reachable from both the public handle and the
/// background sweeper thread.
pub(crate) struct CacheCore {
    entries: DashMap<String, CacheEntry>,
    history: AkceloConcurrentMap<String, KeyHistory>,
    hits: AtomicU64,
    misses: AtomicU64,
    /// Serializes sweeps. Never held during plain get/put.
    sweep_lock: Mutex<()>,
    config: CacheConfig,
}

impl CacheCore {
    fn try_get(&self, key: &str) -> Option<QueryResult> {
        if !self.config.enabled {
            return None;
        }
        let now = Instant::now();

        let mut found_expired = false;
        let result = match self.entries.get_mut(key) {
            Some(mut entry) => {
                if entry.is_expired(now) {
                    found_expired = true;
                    None
                } else {
                    entry.touch(now);
                    Some(entry.result.clone())
                }
            }
            None => None,
        };

        if found_expired {
            // Lazy expiration: purge on sight. Re-checked in case a
            // concurrent put refreshed the entry since the lookup.
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        }

        if result.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            self.history.entry(key.to_string()).or_default().hits += 1;
            tracing::debug!(key, "cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            self.history.entry(key.to_string()).or_default().misses += 1;
            tracing::debug!(key, "cache miss");
        }
        result
    }

    fn put(&self, key: String, result: QueryResult, explicit_ttl: Option<Duration>) {
        if !self.config.enabled {
            return;
        }
        let ttl = explicit_ttl.unwrap_or_else(|| self.adaptive_ttl(&key));

        if self.entries.len() >= self.config.max_entries {
            self.sweep();
        }

        let now = Instant::now();
        match self.entries.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(mut occupied) => {
                occupied.get_mut().refresh(result, now, ttl);
            }
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(CacheEntry::new(result, now, ttl));
            }
        }
    }

    /// Picks a TTL from the key's historical hit frequency.
    fn adaptive_ttl(&self, key: &str) -> Duration {
        let frequency = self.history.get(key).map_or(0, |h| h.hits);
        if frequency > 10 {
            TTL_HOT
        } else if frequency > 5 {
            TTL_WARM
        } else if frequency > 2 {
            TTL_TEPID
        } else {
            self.config.default_ttl
        }
    }

    /// Runs the two-phase eviction sweep.
    ///
    /// Phase 1 drops every expired entry. Phase 2, only if the cache is
    /// still at or over capacity, scores the remainder and evicts the
    /// lowest-scoring 25%.
    pub(crate) fn sweep(&self) -> SweepOutcome {
        let _guard = self.sweep_lock.lock();
        let now = Instant::now();

        let mut expired = 0usize;
        self.entries.retain(|_, entry| {
            if entry.is_expired(now) {
                expired += 1;
                false
            } else {
                true
            }
        });

        let mut evicted = 0usize;
        if self.entries.len() >= self.config.max_entries {
            let mut scored: Vec<(String, f64)> = self
                .entries
                .iter()
                .map(|entry| {
                    let frequency = self
                        .history
                        .get(entry.key())
                        .map_or(entry.access_count, |h| h.hits);
                    let score =
                        eviction_score(frequency, entry.last_accessed, entry.created_at, now);
                    (entry.key().clone(), score)
                })
                .collect();
            scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(CmpOrdering::Equal));

            let target = (scored.len() / 4).max(1);
            for (key, _) in scored.into_iter().take(target) {
                if self.entries.remove(&key).is_some() {
                    evicted += 1;
                }
            }
            tracing::debug!(evicted, "evicted lowest-scoring cache entries");
        }

        SweepOutcome { expired, evicted }
    }

    fn invalidate_for_mutation(&self, mutation: MutationKind, label: Option<&str>) -> usize {
        let mut removed = 0usize;

        if mutation.affects_edges() {
            self.entries.retain(|cache_key, _| {
                let affected = key_touches_edges(cache_key);
                if affected {
                    removed += 1;
                }
                !affected
            });
        } else {
            let label_segment = label.map(key::label_segment);
            self.entries.retain(|cache_key, _| {
                let affected = key_is_unbounded(cache_key)
                    || label_segment
                        .as_deref()
                        .is_some_and(|segment| cache_key.contains(segment));
                if affected {
                    removed += 1;
                }
                !affected
            });
        }

        if removed > 0 {
            tracing::info!(removed, ?mutation, "invalidated cache entries after mutation");
        }
        removed
    }

    fn clear(&self) {
        self.entries.clear();
        tracing::info!("cleared query cache");
    }
}

/// Whether a stored key represents an unbounded or aggregate query.
///
/// Unparseable keys count as affected - over-invalidation is the safe
/// direction.
fn key_is_unbounded(cache_key: &str) -> bool {
    key::kind_of_key(cache_key).is_none_or(QueryKind::is_unbounded)
}

/// Whether a stored key references edges or paths.
fn key_touches_edges(cache_key: &str) -> bool {
    key::kind_of_key(cache_key).is_none_or(QueryKind::touches_edges)
}

/// Aggregate cache statistics.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Current number of entries.
    pub entries: usize,
    /// Configured maximum entry count.
    pub capacity: usize,
    /// Total lookup hits since creation.
    pub hits: u64,
    /// Total lookup misses since creation.
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit, in `[0, 1]`.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            {
                self.hits as f64 / total as f64
            }
        }
    }
}

/// One row of the top-entries diagnostic view.
#[derive(Debug, Clone)]
pub struct TopEntry {
    /// The canonical cache key.
    pub key: String,
    /// How many times the entry was accessed.
    pub access_count: u64,
}

/// The query result cache.
///
/// Construction starts the background maintenance sweeper (unless
/// disabled); dropping the cache stops it.
///
/// # Example
///
/// ```
/// use akcelo_core::cache::{QueryCache, canonical_key};
/// use akcelo_core::graph::query::{QueryKind, QueryResult, QuerySpec};
///
/// let cache = QueryCache::new();
/// let key = canonical_key(&QuerySpec::new(QueryKind::CountNodes).with_label("person"));
///
/// assert!(cache.try_get(&key).is_none());
/// cache.put(key.clone(), QueryResult::Count(42));
/// assert_eq!(cache.try_get(&key), Some(QueryResult::Count(42)));
/// ```
pub struct QueryCache {
    core: Arc<CacheCore>,
    sweeper: Option<CacheSweeper>,
}

impl QueryCache {
    /// Creates a cache with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with a custom configuration.
    #[must_use]
    pub fn with_config(config: CacheConfig) -> Self {
        let start_sweeper = config.enabled && config.background_sweep;
        let sweep_interval = config.sweep_interval;

        let core = Arc::new(CacheCore {
            entries: DashMap::new(),
            history: AkceloConcurrentMap::default(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            sweep_lock: Mutex::new(()),
            config,
        });

        let sweeper =
            start_sweeper.then(|| CacheSweeper::new(Arc::clone(&core), sweep_interval));

        Self { core, sweeper }
    }

    /// Derives the canonical cache key for a query description.
    ///
    /// Convenience re-export of [`canonical_key`].
    #[must_use]
    pub fn key_for(query: &QuerySpec) -> String {
        canonical_key(query)
    }

    /// Looks up a cached result.
    ///
    /// A hit requires the entry to exist and the current time to be
    /// strictly before its expiration; an expired entry found here is
    /// purged immediately and counted as a miss. Hits refresh the entry's
    /// last-access time.
    #[must_use]
    pub fn try_get(&self, key: &str) -> Option<QueryResult> {
        self.core.try_get(key)
    }

    /// Stores a result under the given key with an adaptive TTL.
    ///
    /// Frequently-hit keys get longer TTLs. Re-inserting an existing key
    /// refreshes it in place rather than creating a duplicate. If the
    /// cache is at or over capacity the eviction sweep runs first.
    pub fn put(&self, key: impl Into<String>, result: QueryResult) {
        self.core.put(key.into(), result, None);
    }

    /// Stores a result with an explicit TTL, bypassing the adaptive tiers.
    pub fn put_with_ttl(&self, key: impl Into<String>, result: QueryResult, ttl: Duration) {
        self.core.put(key.into(), result, Some(ttl));
    }

    /// Invalidates cached entries affected by a graph mutation.
    ///
    /// Called synchronously after any node/edge mutation. Node mutations
    /// drop every key referencing the mutated label plus every unbounded
    /// or aggregate key; edge mutations drop every key referencing edges
    /// or paths. Returns the number of entries removed.
    pub fn invalidate_for_mutation(&self, mutation: MutationKind, label: Option<&str>) -> usize {
        self.core.invalidate_for_mutation(mutation, label)
    }

    /// Runs the eviction sweep inline.
    pub fn sweep(&self) -> SweepOutcome {
        self.core.sweep()
    }

    /// Drops all entries unconditionally.
    pub fn clear(&self) {
        self.core.clear();
    }

    /// Current number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.core.entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.core.entries.is_empty()
    }

    /// Aggregate hit/miss statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.core.entries.len(),
            capacity: self.core.config.max_entries,
            hits: self.core.hits.load(Ordering::Relaxed),
            misses: self.core.misses.load(Ordering::Relaxed),
        }
    }

    /// The top `n` currently non-expired entries by access count.
    #[must_use]
    pub fn top_entries(&self, n: usize) -> Vec<TopEntry> {
        let now = Instant::now();
        let mut entries: Vec<TopEntry> = self
            .core
            .entries
            .iter()
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| TopEntry {
                key: entry.key().clone(),
                access_count: entry.access_count,
            })
            .collect();
        entries.sort_by(|a, b| b.access_count.cmp(&a.access_count));
        entries.truncate(n);
        entries
    }

    /// Stops the background sweeper, returning its final statistics.
    ///
    /// Safe to call more than once; later calls return `None`. Dropping
    /// the cache performs the same shutdown implicitly.
    pub fn shutdown(&mut self) -> Option<SweeperStats> {
        self.sweeper.take().and_then(|mut sweeper| sweeper.shutdown())
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::query::QueryKind;
    use std::thread;

    /// Cache without the background thread - tests drive sweeps directly.
    fn inline_cache(max_entries: usize) -> QueryCache {
        QueryCache::with_config(
            CacheConfig::default()
                .with_max_entries(max_entries)
                .without_background_sweep(),
        )
    }

    fn person_key(name_suffix: u64) -> String {
        canonical_key(
            &QuerySpec::new(QueryKind::FindNodes)
                .with_label("person")
                .with_property("name", format!("n{name_suffix}")),
        )
    }

    #[test]
    fn test_put_then_get() {
        let cache = inline_cache(100);
        let key = person_key(1);

        assert!(cache.try_get(&key).is_none());
        cache.put(key.clone(), QueryResult::Count(7));
        assert_eq!(cache.try_get(&key), Some(QueryResult::Count(7)));
    }

    #[test]
    fn test_expired_entry_is_purged_on_lookup() {
        let cache = inline_cache(100);
        let key = person_key(1);

        cache.put_with_ttl(key.clone(), QueryResult::Count(1), Duration::from_millis(30));
        assert!(cache.try_get(&key).is_some());

        thread::sleep(Duration::from_millis(60));

        assert!(cache.try_get(&key).is_none());
        // Lazy expiration removed it from internal storage too
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_reinsert_refreshes_instead_of_duplicating() {
        let cache = inline_cache(100);
        let key = person_key(1);

        cache.put(key.clone(), QueryResult::Count(1));
        cache.put(key.clone(), QueryResult::Count(2));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.try_get(&key), Some(QueryResult::Count(2)));
    }

    #[test]
    fn test_hit_miss_accounting() {
        let cache = inline_cache(100);
        let key = person_key(1);

        assert!(cache.try_get(&key).is_none()); // miss
        cache.put(key.clone(), QueryResult::Empty);
        assert!(cache.try_get(&key).is_some()); // hit
        assert!(cache.try_get(&key).is_some()); // hit

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_adaptive_ttl_tiers() {
        let cache = inline_cache(100);
        let key = person_key(1);

        // No history: default tier
        assert_eq!(cache.core.adaptive_ttl(&key), cache.core.config.default_ttl);

        cache.put(key.clone(), QueryResult::Empty);
        for _ in 0..3 {
            let _ = cache.try_get(&key);
        }
        assert_eq!(cache.core.adaptive_ttl(&key), TTL_TEPID);

        for _ in 0..3 {
            let _ = cache.try_get(&key);
        }
        assert_eq!(cache.core.adaptive_ttl(&key), TTL_WARM);

        for _ in 0..5 {
            let _ = cache.try_get(&key);
        }
        assert_eq!(cache.core.adaptive_ttl(&key), TTL_HOT);
    }

    #[test]
    fn test_eviction_restores_capacity_bound() {
        let cache = inline_cache(8);

        for i in 0..8 {
            cache.put(person_key(i), QueryResult::Count(i));
        }
        assert_eq!(cache.len(), 8);

        // Give the first two keys hit history so they outscore the rest
        for _ in 0..12 {
            let _ = cache.try_get(&person_key(0));
            let _ = cache.try_get(&person_key(1));
        }

        // At capacity: this put sweeps first (evicting 25% = 2 entries)
        cache.put(person_key(8), QueryResult::Count(8));
        assert!(cache.len() <= 8);

        // The frequently-hit entries survive eviction
        assert!(cache.try_get(&person_key(0)).is_some());
        assert!(cache.try_get(&person_key(1)).is_some());
    }

    #[test]
    fn test_sweep_phase_one_removes_expired() {
        let cache = inline_cache(100);
        cache.put_with_ttl(person_key(1), QueryResult::Empty, Duration::from_millis(10));
        cache.put(person_key(2), QueryResult::Empty);

        thread::sleep(Duration::from_millis(30));
        let outcome = cache.sweep();

        assert_eq!(outcome.expired, 1);
        assert_eq!(outcome.evicted, 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidation_on_node_mutation() {
        let cache = inline_cache(100);

        let person = canonical_key(&QuerySpec::new(QueryKind::FindNodes).with_label("person"));
        let company = canonical_key(&QuerySpec::new(QueryKind::FindNodes).with_label("company"));
        let find_all = canonical_key(&QuerySpec::new(QueryKind::FindAllNodes));
        let count = canonical_key(&QuerySpec::new(QueryKind::CountNodes).with_label("company"));
        let aggregate = canonical_key(
            &QuerySpec::new(QueryKind::Aggregate)
                .with_label("company")
                .with_group_by("industry"),
        );

        for key in [&person, &company, &find_all, &count, &aggregate] {
            cache.put((*key).clone(), QueryResult::Empty);
        }

        let removed = cache.invalidate_for_mutation(MutationKind::NodeCreated, Some("person"));

        // The person key and every unbounded/aggregate key are gone...
        assert!(cache.try_get(&person).is_none());
        assert!(cache.try_get(&find_all).is_none());
        assert!(cache.try_get(&count).is_none());
        assert!(cache.try_get(&aggregate).is_none());
        // ...but the bounded company lookup survives
        assert!(cache.try_get(&company).is_some());
        assert_eq!(removed, 4);
    }

    #[test]
    fn test_invalidation_does_not_match_label_prefixes() {
        let cache = inline_cache(100);
        let personnel =
            canonical_key(&QuerySpec::new(QueryKind::FindNodes).with_label("personnel"));
        cache.put(personnel.clone(), QueryResult::Empty);

        cache.invalidate_for_mutation(MutationKind::NodeCreated, Some("person"));

        assert!(cache.try_get(&personnel).is_some());
    }

    #[test]
    fn test_invalidation_on_edge_mutation() {
        let cache = inline_cache(100);

        let nodes = canonical_key(&QuerySpec::new(QueryKind::FindNodes).with_label("person"));
        let edges = canonical_key(&QuerySpec::new(QueryKind::FindEdges).with_edge_type("knows"));
        let path = canonical_key(&QuerySpec::new(QueryKind::FindPath));
        let neighbors = canonical_key(&QuerySpec::new(QueryKind::Neighbors));

        for key in [&nodes, &edges, &path, &neighbors] {
            cache.put((*key).clone(), QueryResult::Empty);
        }

        cache.invalidate_for_mutation(MutationKind::EdgeDeleted, None);

        assert!(cache.try_get(&edges).is_none());
        assert!(cache.try_get(&path).is_none());
        assert!(cache.try_get(&neighbors).is_none());
        // Node lookups are unaffected by edge mutations
        assert!(cache.try_get(&nodes).is_some());
    }

    #[test]
    fn test_foreign_keys_are_always_invalidated() {
        // Keys not produced by canonical_key cannot be classified, so the
        // policy errs on the side of dropping them.
        let cache = inline_cache(100);
        cache.put("handwritten-key", QueryResult::Empty);

        cache.invalidate_for_mutation(MutationKind::NodeUpdated, None);
        assert!(cache.try_get("handwritten-key").is_none());
    }

    #[test]
    fn test_clear() {
        let cache = inline_cache(100);
        cache.put(person_key(1), QueryResult::Empty);
        cache.put(person_key(2), QueryResult::Empty);

        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.try_get(&person_key(1)).is_none());
    }

    #[test]
    fn test_disabled_cache_never_hits() {
        let cache = QueryCache::with_config(CacheConfig::default().disabled());
        cache.put(person_key(1), QueryResult::Count(1));
        assert!(cache.try_get(&person_key(1)).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_top_entries_ranking() {
        let cache = inline_cache(100);
        for i in 0..3 {
            cache.put(person_key(i), QueryResult::Empty);
        }
        for _ in 0..5 {
            let _ = cache.try_get(&person_key(2));
        }
        for _ in 0..2 {
            let _ = cache.try_get(&person_key(0));
        }

        let top = cache.top_entries(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].key, person_key(2));
        assert_eq!(top[0].access_count, 5);
        assert_eq!(top[1].key, person_key(0));
    }

    #[test]
    fn test_top_entries_skips_expired() {
        let cache = inline_cache(100);
        cache.put_with_ttl(person_key(1), QueryResult::Empty, Duration::from_millis(10));
        cache.put(person_key(2), QueryResult::Empty);

        thread::sleep(Duration::from_millis(30));

        let top = cache.top_entries(10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].key, person_key(2));
    }

    #[test]
    fn test_background_sweeper_reclaims_idle_cache() {
        let mut cache = QueryCache::with_config(
            CacheConfig::default()
                .with_max_entries(100)
                .with_sweep_interval(Duration::from_millis(25)),
        );
        cache.put_with_ttl(person_key(1), QueryResult::Empty, Duration::from_millis(10));

        // No lookups happen; only the background sweeper can reclaim it
        thread::sleep(Duration::from_millis(150));
        assert_eq!(cache.len(), 0);

        let stats = cache.shutdown().expect("sweeper was running");
        assert!(stats.sweep_count >= 1);
        assert!(stats.expired_total >= 1);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut cache = QueryCache::new();
        assert!(cache.shutdown().is_some());
        assert!(cache.shutdown().is_none());
    }

    #[test]
    fn test_concurrent_get_put_during_sweep() {
        use std::sync::Arc as StdArc;

        let cache = StdArc::new(inline_cache(64));
        let mut handles = Vec::new();

        for t in 0..4u64 {
            let cache = StdArc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..200u64 {
                    let key = person_key(t * 1000 + i);
                    cache.put(key.clone(), QueryResult::Count(i));
                    let _ = cache.try_get(&key);
                    if i % 50 == 0 {
                        let _ = cache.sweep();
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // Capacity bound holds after the dust settles
        let _ = cache.sweep();
        assert!(cache.len() <= 64);
    }
}
