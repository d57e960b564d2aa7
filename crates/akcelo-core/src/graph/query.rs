//! The parsed query description and cached result payloads.
//!
//! [`QuerySpec`] is produced upstream (by the query translator) and
//! consumed here for exactly one purpose: deriving a canonical cache
//! signature. The acceleration layer never reinterprets it as an
//! executable plan.

use akcelo_common::types::{NodeId, Value};
use akcelo_common::utils::hash::FxHashMap;
use arcstr::ArcStr;
use std::fmt;

use super::{Edge, Node};

/// The kind of query a [`QuerySpec`] describes.
///
/// The cache's invalidation policy keys off the classification helpers:
/// unbounded kinds are dropped on any node mutation, edge-touching kinds
/// on any edge mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Nodes matching a label and/or property constraints.
    FindNodes,
    /// Every node in the graph.
    FindAllNodes,
    /// Edges matching a relation type and/or endpoints.
    FindEdges,
    /// A path between two endpoints.
    FindPath,
    /// Direct neighbors of a node.
    Neighbors,
    /// Node count, optionally per label.
    CountNodes,
    /// Edge count, optionally per relation type.
    CountEdges,
    /// A grouped/aggregated rollup over nodes.
    Aggregate,
}

impl QueryKind {
    /// The stable tag written into canonical cache keys.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::FindNodes => "find_nodes",
            Self::FindAllNodes => "find_all_nodes",
            Self::FindEdges => "find_edges",
            Self::FindPath => "find_path",
            Self::Neighbors => "neighbors",
            Self::CountNodes => "count_nodes",
            Self::CountEdges => "count_edges",
            Self::Aggregate => "aggregate",
        }
    }

    /// Parses a tag previously produced by [`tag`](Self::tag).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "find_nodes" => Some(Self::FindNodes),
            "find_all_nodes" => Some(Self::FindAllNodes),
            "find_edges" => Some(Self::FindEdges),
            "find_path" => Some(Self::FindPath),
            "neighbors" => Some(Self::Neighbors),
            "count_nodes" => Some(Self::CountNodes),
            "count_edges" => Some(Self::CountEdges),
            "aggregate" => Some(Self::Aggregate),
            _ => None,
        }
    }

    /// Whether this kind scans or aggregates without a label bound.
    ///
    /// Unbounded results can be affected by any node mutation, so cached
    /// entries of these kinds are invalidated regardless of label.
    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        matches!(
            self,
            Self::FindAllNodes | Self::CountNodes | Self::CountEdges | Self::Aggregate
        )
    }

    /// Whether this kind's result depends on edges or paths.
    #[must_use]
    pub const fn touches_edges(self) -> bool {
        matches!(
            self,
            Self::FindEdges | Self::FindPath | Self::Neighbors | Self::CountEdges
        )
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A single order-by clause: property name plus direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByClause {
    /// The property to sort on.
    pub property: String,
    /// Sort descending instead of ascending.
    pub descending: bool,
}

impl OrderByClause {
    /// Creates an ascending clause.
    #[must_use]
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            descending: false,
        }
    }

    /// Creates a descending clause.
    #[must_use]
    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            descending: true,
        }
    }
}

/// The shape of a parsed query, consumed for canonical key generation.
///
/// Built with the `with_*` methods; the property and condition maps are
/// insertion-order-independent because key generation sorts them.
///
/// # Example
///
/// ```
/// use akcelo_core::graph::query::{QueryKind, QuerySpec};
/// use akcelo_common::types::Value;
///
/// let query = QuerySpec::new(QueryKind::FindNodes)
///     .with_label("person")
///     .with_condition("age>", Value::from(21i64))
///     .with_limit(10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    /// What the query does.
    pub kind: Option<QueryKind>,
    /// Target node label, if any.
    pub label: Option<ArcStr>,
    /// Target edge relation type, if any.
    pub edge_type: Option<ArcStr>,
    /// Source endpoint for path/neighbor queries.
    pub source: Option<NodeId>,
    /// Target endpoint for path queries.
    pub target: Option<NodeId>,
    /// Exact-match property constraints.
    pub properties: FxHashMap<String, Value>,
    /// Condition constraints (keys may carry comparison-operator suffixes).
    pub conditions: FxHashMap<String, Value>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Number of results to skip.
    pub offset: Option<usize>,
    /// Group-by property names, in declared order.
    pub group_by: Vec<String>,
    /// Order-by clauses, in declared order.
    pub order_by: Vec<OrderByClause>,
}

impl QuerySpec {
    /// Creates a query description of the given kind.
    #[must_use]
    pub fn new(kind: QueryKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Sets the target label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<ArcStr>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the target edge relation type.
    #[must_use]
    pub fn with_edge_type(mut self, edge_type: impl Into<ArcStr>) -> Self {
        self.edge_type = Some(edge_type.into());
        self
    }

    /// Sets the source and target endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, source: NodeId, target: NodeId) -> Self {
        self.source = Some(source);
        self.target = Some(target);
        self
    }

    /// Adds an exact-match property constraint.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Adds a condition constraint.
    #[must_use]
    pub fn with_condition(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(key.into(), value.into());
        self
    }

    /// Sets the result limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the result offset.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Appends a group-by property.
    #[must_use]
    pub fn with_group_by(mut self, property: impl Into<String>) -> Self {
        self.group_by.push(property.into());
        self
    }

    /// Appends an order-by clause.
    #[must_use]
    pub fn with_order_by(mut self, clause: OrderByClause) -> Self {
        self.order_by.push(clause);
        self
    }
}

/// A cached query result payload.
///
/// The executor stores whatever shape its query produced; the cache treats
/// all of them as opaque.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Full node views.
    Nodes(Vec<Node>),
    /// Full edge views.
    Edges(Vec<Edge>),
    /// Bare node identifiers.
    Ids(Vec<NodeId>),
    /// A scalar count.
    Count(u64),
    /// A query that produced nothing.
    Empty,
}

impl QueryResult {
    /// Returns the number of items this result carries.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Nodes(n) => n.len(),
            Self::Edges(e) => e.len(),
            Self::Ids(i) => i.len(),
            Self::Count(_) => 1,
            Self::Empty => 0,
        }
    }

    /// Returns `true` if this result carries no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
