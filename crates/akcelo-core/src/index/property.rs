//! Property indexes for O(1) equality lookups and bucketed range scans.
//!
//! Each (label, property, value) triple owns a bucket: the set of node ids
//! currently holding that exact value. Only properties in the auto-index
//! set get buckets; every property additionally feeds a usage counter so
//! operators can see which properties would benefit from being added.
//!
//! The caller (the graph store's mutation path) is responsible for calling
//! [`PropertyIndexes::index_node`], [`PropertyIndexes::update_node`] and
//! [`PropertyIndexes::remove_node`] synchronously with each mutation,
//! passing the pre-mutation property snapshot on update.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use akcelo_common::collections::AkceloConcurrentMap;
use akcelo_common::types::{
    HashableValue, NodeId, OrderableValue, PropertyKey, Value, compare_same_kind,
};
use akcelo_common::utils::hash::{FxHashMap, FxHashSet};
use arcstr::ArcStr;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::graph::Node;

/// Properties indexed by default.
///
/// These cover the hot lookup paths of typical graph workloads. The set is
/// mutable at runtime via [`PropertyIndexes::add_auto_property`] /
/// [`PropertyIndexes::remove_auto_property`].
pub const DEFAULT_AUTO_INDEXED: &[&str] = &[
    "name",
    "department",
    "role",
    "salary",
    "age",
    "industry",
    "status",
    "location",
    "city",
];

/// Identifies one per-(label, property) index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey {
    label: ArcStr,
    property: PropertyKey,
}

impl IndexKey {
    fn new(label: ArcStr, property: PropertyKey) -> Self {
        Self { label, property }
    }
}

/// Value buckets for one (label, property) pair.
///
/// DashMap keeps bucket mutations atomic per value without blocking
/// unrelated values.
type ValueBuckets = DashMap<HashableValue, FxHashSet<NodeId>>;

/// The secondary index manager.
///
/// Layout follows the two-level scheme the rest of the codebase uses for
/// concurrent nested maps: an outer `RwLock<FxHashMap>` that only takes a
/// write lock when a whole (label, property) index appears or disappears,
/// with sharded `DashMap` buckets underneath for the hot path.
///
/// # Example
///
/// ```
/// use akcelo_core::graph::Node;
/// use akcelo_core::index::PropertyIndexes;
/// use akcelo_common::types::{NodeId, Value};
///
/// let indexes = PropertyIndexes::new();
/// let alice = Node::new(NodeId::new(1), "person").with_property("city", "Oslo");
/// indexes.index_node(&alice);
///
/// let found = indexes.find_by_property("person", "city", &Value::from("Oslo"));
/// assert!(found.contains(&NodeId::new(1)));
/// ```
pub struct PropertyIndexes {
    /// label+property -> value -> node ids.
    buckets: RwLock<FxHashMap<IndexKey, ValueBuckets>>,
    /// How many times a node with this label+property was indexed.
    /// Diagnostics only - never resets, never drives promotion.
    usage: AkceloConcurrentMap<IndexKey, u64>,
    /// Property names eligible for indexing.
    auto_properties: RwLock<FxHashSet<PropertyKey>>,
}

impl PropertyIndexes {
    /// Creates an index manager seeded with [`DEFAULT_AUTO_INDEXED`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_auto_properties(DEFAULT_AUTO_INDEXED.iter().copied())
    }

    /// Creates an index manager with a custom auto-index set.
    #[must_use]
    pub fn with_auto_properties<I>(properties: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PropertyKey>,
    {
        let auto: FxHashSet<PropertyKey> = properties.into_iter().map(Into::into).collect();
        Self {
            buckets: RwLock::new(FxHashMap::default()),
            usage: AkceloConcurrentMap::default(),
            auto_properties: RwLock::new(auto),
        }
    }

    /// Indexes every auto-indexed property of `node` and bumps usage
    /// counters for all of its properties.
    pub fn index_node(&self, node: &Node) {
        let auto = self.auto_properties.read();
        for (key, value) in &node.properties {
            let index_key = IndexKey::new(node.label.clone(), key.clone());
            *self.usage.entry(index_key.clone()).or_insert(0) += 1;

            if auto.contains(key) {
                self.insert_into_bucket(index_key, HashableValue::new(value.clone()), node.id);
            }
        }
    }

    /// Removes `node` from every bucket it currently occupies.
    ///
    /// Buckets that become empty are deleted. Properties no longer in the
    /// auto-index set are still cleaned up here - their buckets may have
    /// been created before the set changed.
    pub fn remove_node(&self, node: &Node) {
        let buckets = self.buckets.read();
        for (key, value) in &node.properties {
            let index_key = IndexKey::new(node.label.clone(), key.clone());
            if let Some(map) = buckets.get(&index_key) {
                Self::remove_from_bucket(map, &HashableValue::new(value.clone()), node.id);
            }
        }
    }

    /// Re-indexes `node` after a mutation.
    ///
    /// `old_properties` is the node's property snapshot from *before* the
    /// mutation: the node id is removed from the buckets its old values
    /// occupied, then added to buckets for its current values. Only
    /// auto-indexed properties gain new bucket entries; stale entries are
    /// cleared regardless of the current auto-index set.
    pub fn update_node(&self, node: &Node, old_properties: &BTreeMap<PropertyKey, Value>) {
        {
            let buckets = self.buckets.read();
            for (key, old_value) in old_properties {
                let index_key = IndexKey::new(node.label.clone(), key.clone());
                if let Some(map) = buckets.get(&index_key) {
                    Self::remove_from_bucket(map, &HashableValue::new(old_value.clone()), node.id);
                }
            }
        }

        let auto = self.auto_properties.read();
        for (key, value) in &node.properties {
            if auto.contains(key) {
                let index_key = IndexKey::new(node.label.clone(), key.clone());
                self.insert_into_bucket(index_key, HashableValue::new(value.clone()), node.id);
            }
        }
    }

    /// Exact bucket lookup.
    ///
    /// An absent label, property or value yields an empty set, never an
    /// error.
    #[must_use]
    pub fn find_by_property(&self, label: &str, property: &str, value: &Value) -> FxHashSet<NodeId> {
        let index_key = IndexKey::new(ArcStr::from(label), PropertyKey::new(property));
        let buckets = self.buckets.read();
        buckets
            .get(&index_key)
            .and_then(|map| {
                map.get(&HashableValue::new(value.clone()))
                    .map(|ids| ids.clone())
            })
            .unwrap_or_default()
    }

    /// Union of all buckets whose value falls within `[min, max]`
    /// inclusive under the value's natural ordering.
    ///
    /// Bucket values whose type cannot be ordered against the bounds are
    /// silently excluded.
    #[must_use]
    pub fn find_by_range(
        &self,
        label: &str,
        property: &str,
        min: &Value,
        max: &Value,
    ) -> FxHashSet<NodeId> {
        // Bounds without a natural ordering can never match anything.
        if OrderableValue::try_from(min).is_none() || OrderableValue::try_from(max).is_none() {
            return FxHashSet::default();
        }

        let index_key = IndexKey::new(ArcStr::from(label), PropertyKey::new(property));
        let buckets = self.buckets.read();
        let Some(map) = buckets.get(&index_key) else {
            return FxHashSet::default();
        };

        let mut out = FxHashSet::default();
        for entry in map.iter() {
            if value_in_range(entry.key().inner(), min, max) {
                out.extend(entry.value().iter().copied());
            }
        }
        out
    }

    /// Adds a property name to the auto-index set.
    ///
    /// Existing nodes are not retroactively indexed - call
    /// [`rebuild`](Self::rebuild) to reconcile.
    pub fn add_auto_property(&self, property: impl Into<PropertyKey>) {
        self.auto_properties.write().insert(property.into());
    }

    /// Removes a property name from the auto-index set.
    ///
    /// Existing buckets are left in place until the next
    /// [`rebuild`](Self::rebuild). Returns `true` if the property was in
    /// the set.
    pub fn remove_auto_property(&self, property: &str) -> bool {
        self.auto_properties
            .write()
            .remove(&PropertyKey::new(property))
    }

    /// Checks whether a property name is currently auto-indexed.
    #[must_use]
    pub fn is_auto_indexed(&self, property: &str) -> bool {
        self.auto_properties
            .read()
            .contains(&PropertyKey::new(property))
    }

    /// Clears every bucket and re-indexes from the given full node set.
    ///
    /// Used after bulk load, or to reconcile the buckets with auto-index
    /// set changes. Usage counters are monotonic and keep accumulating.
    pub fn rebuild(&self, nodes: &[Node]) {
        self.buckets.write().clear();
        for node in nodes {
            self.index_node(node);
        }
        tracing::info!(nodes = nodes.len(), "rebuilt property indexes");
    }

    /// Returns a diagnostic snapshot of the index state.
    ///
    /// The snapshot is eventually consistent - it does not freeze the
    /// buckets while concurrent writers proceed.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        let mut per_label: BTreeMap<ArcStr, (usize, FxHashSet<NodeId>)> = BTreeMap::new();
        {
            let buckets = self.buckets.read();
            for (key, map) in buckets.iter() {
                let entry = per_label.entry(key.label.clone()).or_default();
                entry.0 += 1;
                for bucket in map.iter() {
                    entry.1.extend(bucket.value().iter().copied());
                }
            }
        }

        let labels: Vec<LabelIndexStats> = per_label
            .into_iter()
            .map(|(label, (properties, ids))| LabelIndexStats {
                label,
                indexed_properties: properties,
                indexed_nodes: ids.len(),
            })
            .collect();

        let mut usage: Vec<PropertyUsage> = self
            .usage
            .iter()
            .map(|entry| PropertyUsage {
                label: entry.key().label.clone(),
                property: entry.key().property.clone(),
                count: *entry.value(),
            })
            .collect();
        usage.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.label.cmp(&b.label))
                .then_with(|| a.property.cmp(&b.property))
        });

        IndexStats {
            label_count: labels.len(),
            labels,
            usage,
        }
    }

    /// Total number of value buckets across all indexes.
    ///
    /// Diagnostic helper; also exercised by tests asserting that empty
    /// buckets are deleted rather than left behind.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.read().values().map(DashMap::len).sum()
    }

    fn insert_into_bucket(&self, index_key: IndexKey, value: HashableValue, id: NodeId) {
        {
            let buckets = self.buckets.read();
            if let Some(map) = buckets.get(&index_key) {
                map.entry(value).or_default().insert(id);
                return;
            }
        }

        // First value for this label+property: take the write lock to
        // create the per-property map, re-checking under the lock.
        let mut buckets = self.buckets.write();
        buckets
            .entry(index_key)
            .or_default()
            .entry(value)
            .or_default()
            .insert(id);
    }

    fn remove_from_bucket(map: &ValueBuckets, value: &HashableValue, id: NodeId) {
        let emptied = match map.get_mut(value) {
            Some(mut ids) => {
                ids.remove(&id);
                ids.is_empty()
            }
            None => false,
        };
        if emptied {
            // Re-check under the removal so a concurrent insert between
            // the guard drop and this call is not thrown away.
            map.remove_if(value, |_, ids| ids.is_empty());
        }
    }
}

impl Default for PropertyIndexes {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks if a value lies within `[min, max]` inclusive.
fn value_in_range(value: &Value, min: &Value, max: &Value) -> bool {
    match compare_same_kind(value, min) {
        Some(Ordering::Less) | None => return false,
        _ => {}
    }
    match compare_same_kind(value, max) {
        Some(Ordering::Greater) | None => return false,
        _ => {}
    }
    true
}

/// Snapshot of index state for diagnostics.
#[derive(Debug, Clone)]
pub struct IndexStats {
    /// Number of labels with at least one index.
    pub label_count: usize,
    /// Per-label breakdown, sorted by label.
    pub labels: Vec<LabelIndexStats>,
    /// Usage counters, most-used first.
    pub usage: Vec<PropertyUsage>,
}

/// Per-label index statistics.
#[derive(Debug, Clone)]
pub struct LabelIndexStats {
    /// The label.
    pub label: ArcStr,
    /// Number of indexed properties under this label.
    pub indexed_properties: usize,
    /// Number of distinct nodes indexed under this label.
    pub indexed_nodes: usize,
}

/// One usage-counter reading.
#[derive(Debug, Clone)]
pub struct PropertyUsage {
    /// The label.
    pub label: ArcStr,
    /// The property name.
    pub property: PropertyKey,
    /// How many times a node with this property was indexed.
    pub count: u64,
}
