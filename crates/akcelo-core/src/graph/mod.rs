//! Graph item views and the graph-source seam.
//!
//! The acceleration layer does not own nodes or edges - the underlying
//! graph store does. [`Node`] and [`Edge`] are the views handed across
//! that boundary, and [`GraphSource`] is the read-accessor trait the
//! pagination and index-rebuild paths consume.

pub mod query;

use std::collections::BTreeMap;

use akcelo_common::types::{EdgeId, NodeId, PropertyKey, Value};
use arcstr::ArcStr;

/// A node as seen by the acceleration layer.
///
/// One label, one property map. The id is assigned by the graph store and
/// only referenced here.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Label (category name) attached to this node.
    pub label: ArcStr,
    /// Properties stored on this node.
    pub properties: BTreeMap<PropertyKey, Value>,
}

impl Node {
    /// Creates a new node view with the given id and label.
    #[must_use]
    pub fn new(id: NodeId, label: impl Into<ArcStr>) -> Self {
        Self {
            id,
            label: label.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Sets a property on this node, returning self for chaining.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Sets a property on this node.
    pub fn set_property(&mut self, key: impl Into<PropertyKey>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Gets a property from this node.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(&PropertyKey::new(key))
    }

    /// Removes a property from this node.
    pub fn remove_property(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(&PropertyKey::new(key))
    }

    /// Checks if this node has the given label.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_str() == label
    }
}

/// An edge as seen by the acceleration layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Unique identifier.
    pub id: EdgeId,
    /// Relation-type name.
    pub edge_type: ArcStr,
    /// Source node identifier.
    pub source: NodeId,
    /// Target node identifier.
    pub target: NodeId,
    /// Properties stored on this edge.
    pub properties: BTreeMap<PropertyKey, Value>,
}

impl Edge {
    /// Creates a new edge view.
    #[must_use]
    pub fn new(id: EdgeId, edge_type: impl Into<ArcStr>, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            edge_type: edge_type.into(),
            source,
            target,
            properties: BTreeMap::new(),
        }
    }

    /// Sets a property on this edge, returning self for chaining.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Sets a property on this edge.
    pub fn set_property(&mut self, key: impl Into<PropertyKey>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Gets a property from this edge.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(&PropertyKey::new(key))
    }
}

/// Read accessors consumed from the underlying graph store.
///
/// Each call materializes a snapshot of the matching items - callers never
/// observe a partially applied mutation, but no consistency is promised
/// across separate calls.
pub trait GraphSource: Send + Sync {
    /// Returns all nodes carrying the given label.
    fn nodes_with_label(&self, label: &str) -> Vec<Node>;

    /// Returns all nodes in the store.
    fn all_nodes(&self) -> Vec<Node>;

    /// Returns all edges, optionally filtered by relation type.
    fn edges(&self, edge_type: Option<&str>) -> Vec<Edge>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_properties() {
        let mut node = Node::new(NodeId::new(1), "person");

        node.set_property("name", "Alice");
        node.set_property("age", 30i64);

        assert_eq!(node.property("name").and_then(Value::as_str), Some("Alice"));
        assert_eq!(node.property("age").and_then(Value::as_int64), Some(30));
        assert!(node.property("missing").is_none());

        let removed = node.remove_property("name");
        assert!(removed.is_some());
        assert!(node.property("name").is_none());
    }

    #[test]
    fn test_node_label() {
        let node = Node::new(NodeId::new(1), "person");
        assert!(node.has_label("person"));
        assert!(!node.has_label("company"));
    }

    #[test]
    fn test_node_builder() {
        let node = Node::new(NodeId::new(2), "person")
            .with_property("name", "Bob")
            .with_property("age", 25i64);
        assert_eq!(node.properties.len(), 2);
    }

    #[test]
    fn test_edge_basic() {
        let edge = Edge::new(EdgeId::new(1), "works_at", NodeId::new(1), NodeId::new(2))
            .with_property("since", 2020i64);

        assert_eq!(edge.edge_type.as_str(), "works_at");
        assert_eq!(edge.property("since").and_then(Value::as_int64), Some(2020));
    }
}
