//! Cache entry record.

use std::time::{Duration, Instant};

use crate::graph::query::QueryResult;

/// One cached query result with its lifecycle timestamps.
///
/// Created on miss+compute, refreshed in place on re-insertion of the same
/// key, destroyed by lazy expiration, explicit clear, invalidation or
/// eviction.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    /// The cached result payload.
    pub result: QueryResult,
    /// When the entry was created.
    pub created_at: Instant,
    /// When the entry was last read or refreshed.
    pub last_accessed: Instant,
    /// Absolute expiration time.
    pub expires_at: Instant,
    /// How many times this entry was read or refreshed.
    pub access_count: u64,
}

impl CacheEntry {
    pub fn new(result: QueryResult, now: Instant, ttl: Duration) -> Self {
        Self {
            result,
            created_at: now,
            last_accessed: now,
            expires_at: now + ttl,
            access_count: 0,
        }
    }

    /// A hit requires the current time to be strictly before expiry.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Records a read.
    pub fn touch(&mut self, now: Instant) {
        self.last_accessed = now;
        self.access_count += 1;
    }

    /// Replaces the payload in place on re-insertion of the same key.
    pub fn refresh(&mut self, result: QueryResult, now: Instant, ttl: Duration) {
        self.result = result;
        self.last_accessed = now;
        self.expires_at = now + ttl;
        self.access_count += 1;
    }
}
