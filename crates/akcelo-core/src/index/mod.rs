//! Secondary index structures that make queries fast.
//!
//! The one index this layer maintains is the property index: per
//! (label, property) buckets mapping a value to the node ids carrying it,
//! so equality and range lookups skip the full scan.
//!
//! Buckets are sharded ([`dashmap`]) - mutating one (label, property,
//! value) bucket never blocks readers or writers of unrelated buckets.

pub mod property;

pub use property::{IndexStats, LabelIndexStats, PropertyIndexes, PropertyUsage};
