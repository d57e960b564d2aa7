//! Fast hashing with FxHash (non-cryptographic).
//!
//! FxHash trades collision resistance for speed, which is the right trade
//! for in-memory index keys and cache signatures. Never use it for
//! anything security-sensitive.

pub use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet, FxHasher};

use std::hash::{Hash, Hasher};

/// Hashes a single value with FxHash.
#[must_use]
pub fn fx_hash_one<T: Hash>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_hash_one_deterministic() {
        assert_eq!(fx_hash_one(&"akcelo"), fx_hash_one(&"akcelo"));
        assert_ne!(fx_hash_one(&"a"), fx_hash_one(&"b"));
    }

    #[test]
    fn test_fx_map_basic() {
        let mut map: FxHashMap<&str, u32> = FxHashMap::default();
        map.insert("x", 1);
        assert_eq!(map.get("x"), Some(&1));
    }
}
