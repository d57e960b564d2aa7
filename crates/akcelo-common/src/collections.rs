//! Standard collection type aliases for Akcelo.
//!
//! Use these instead of direct HashMap/HashSet to allow future optimization
//! and ensure consistent hashing across the codebase.
//!
//! # Type Aliases
//!
//! | Type | Use Case |
//! |------|----------|
//! | [`AkceloMap`] | Single-threaded hash map |
//! | [`AkceloSet`] | Single-threaded hash set |
//! | [`AkceloConcurrentMap`] | Multi-threaded hash map |
//! | [`AkceloConcurrentSet`] | Multi-threaded hash set |
//!
//! # Example
//!
//! ```rust
//! use akcelo_common::collections::{AkceloMap, AkceloSet};
//!
//! let mut map: AkceloMap<String, i32> = AkceloMap::default();
//! map.insert("key".to_string(), 42);
//!
//! let mut set: AkceloSet<i32> = AkceloSet::default();
//! set.insert(1);
//! ```

use rustc_hash::FxBuildHasher;

/// Standard HashMap with FxHash (fast, non-cryptographic).
///
/// FxHash is optimized for small keys and provides excellent performance
/// for integer and string keys common in graph databases.
pub type AkceloMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Standard HashSet with FxHash.
pub type AkceloSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// Concurrent HashMap for multi-threaded access.
///
/// Uses fine-grained locking for high concurrent throughput.
/// Prefer this over `Arc<Mutex<HashMap>>` for shared mutable state.
pub type AkceloConcurrentMap<K, V> = dashmap::DashMap<K, V, FxBuildHasher>;

/// Concurrent HashSet for multi-threaded access.
pub type AkceloConcurrentSet<T> = dashmap::DashSet<T, FxBuildHasher>;
