//! Eviction scoring.
//!
//! The score ranks entries for removal under capacity pressure: higher
//! scores survive longer. It is a pure function over the entry's observed
//! history so it can be unit-tested without the surrounding concurrent
//! map.

use std::time::Instant;

/// Computes the eviction fitness of a cache entry.
///
/// ```text
/// score = ln(frequency + 1) * 10
///       + max(0, 100 - minutes_since_last_access)
///       - min(50, minutes_since_creation)
/// ```
///
/// Frequently-hit, recently-accessed, younger entries score higher. The
/// recency bonus decays to zero after 100 idle minutes and the age
/// penalty saturates at 50 minutes, so neither term can dominate
/// unboundedly.
#[must_use]
pub fn eviction_score(
    frequency: u64,
    last_accessed: Instant,
    created_at: Instant,
    now: Instant,
) -> f64 {
    let minutes_idle = now.saturating_duration_since(last_accessed).as_secs_f64() / 60.0;
    let minutes_age = now.saturating_duration_since(created_at).as_secs_f64() / 60.0;

    #[allow(clippy::cast_precision_loss)]
    let frequency_term = ((frequency as f64) + 1.0).ln() * 10.0;
    let recency_bonus = (100.0 - minutes_idle).max(0.0);
    let age_penalty = minutes_age.min(50.0);

    frequency_term + recency_bonus - age_penalty
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_fresh_entry_score() {
        let now = Instant::now();
        // freq 0, just accessed, just created: 0 + 100 - 0
        let score = eviction_score(0, now, now, now);
        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_frequency_raises_score() {
        let now = Instant::now();
        let cold = eviction_score(0, now, now, now);
        let warm = eviction_score(5, now, now, now);
        let hot = eviction_score(50, now, now, now);
        assert!(cold < warm);
        assert!(warm < hot);
    }

    #[test]
    fn test_idle_time_lowers_score() {
        let start = Instant::now();
        let now = start + 120 * MINUTE;
        let recent = eviction_score(1, now - MINUTE, start, now);
        let stale = eviction_score(1, now - 90 * MINUTE, start, now);
        assert!(stale < recent);
    }

    #[test]
    fn test_recency_bonus_floors_at_zero() {
        let start = Instant::now();
        let now = start + 300 * MINUTE;
        // Idle 200 minutes vs 150: both past the 100-minute floor
        let a = eviction_score(1, now - 200 * MINUTE, now, now);
        let b = eviction_score(1, now - 150 * MINUTE, now, now);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_age_penalty_saturates_at_fifty() {
        let start = Instant::now();
        let now = start + 300 * MINUTE;
        // Created 100 vs 200 minutes ago: penalty capped at 50 for both
        let a = eviction_score(1, now, now - 100 * MINUTE, now);
        let b = eviction_score(1, now, now - 200 * MINUTE, now);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_young_beats_old_all_else_equal() {
        let start = Instant::now();
        let now = start + 40 * MINUTE;
        let young = eviction_score(3, now, now - 5 * MINUTE, now);
        let old = eviction_score(3, now, now - 40 * MINUTE, now);
        assert!(young > old);
    }
}
