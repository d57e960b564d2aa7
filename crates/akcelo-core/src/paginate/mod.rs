//! Cursor-based pagination over filtered, sorted result sets.
//!
//! Pages are addressed by opaque cursors instead of numeric offsets, so a
//! page stays well-defined for any filter/sort combination. Each call
//! materializes the full candidate set from the graph store, filters,
//! sorts, and slices - cost is linear in the unfiltered candidate set per
//! call, a deliberate scope limitation rather than an oversight.
//!
//! Pagination is a read path and fails soft: any internal error is caught
//! at the boundary and converted to an empty page.

pub mod cursor;
mod filter;
mod order;

pub use cursor::{ItemKind, PageCursor};

use akcelo_common::types::Value;
use akcelo_common::utils::error::Result;
use akcelo_common::utils::hash::FxHashMap;
use arcstr::ArcStr;

use crate::graph::query::OrderByClause;
use crate::graph::{Edge, GraphSource, Node};
use filter::Condition;

/// Page size used when a request does not name one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// What a page request selects from the graph store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// All nodes carrying a label.
    NodeLabel(ArcStr),
    /// All edges of a relation type.
    EdgeType(ArcStr),
    /// Every node in the store.
    AllNodes,
}

/// One item of a page - a node or an edge.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphItem {
    /// A node view.
    Node(Node),
    /// An edge view.
    Edge(Edge),
}

impl GraphItem {
    /// The raw identifier of the underlying item.
    #[must_use]
    pub fn raw_id(&self) -> u64 {
        match self {
            Self::Node(node) => node.id.as_u64(),
            Self::Edge(edge) => edge.id.as_u64(),
        }
    }

    /// Whether this item is a node or an edge.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Node(_) => ItemKind::Node,
            Self::Edge(_) => ItemKind::Edge,
        }
    }

    /// Looks up a property on the underlying item.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Node(node) => node.property(key),
            Self::Edge(edge) => edge.property(key),
        }
    }

    /// Returns the node view if this item is a node.
    #[must_use]
    pub const fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            Self::Edge(_) => None,
        }
    }

    /// Returns the edge view if this item is an edge.
    #[must_use]
    pub const fn as_edge(&self) -> Option<&Edge> {
        match self {
            Self::Edge(edge) => Some(edge),
            Self::Node(_) => None,
        }
    }
}

/// A pagination request.
///
/// Built with the `with_*` methods:
///
/// ```
/// use akcelo_core::paginate::PageRequest;
/// use akcelo_common::types::Value;
///
/// let request = PageRequest::nodes("person")
///     .with_condition("age>", Value::from(21i64))
///     .with_page_size(10);
/// ```
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// What to select from the store.
    pub selector: Selector,
    /// Conditions to AND together (keys may carry operator suffixes).
    pub conditions: FxHashMap<String, Value>,
    /// Sort clauses, applied as a stable multi-key sort.
    pub order_by: Vec<OrderByClause>,
    /// Number of items per page.
    pub page_size: usize,
    /// Cursor token from a previous page, if resuming.
    pub cursor: Option<String>,
    /// Paging direction: `true` resumes after the anchor, `false` before.
    pub forward: bool,
}

impl PageRequest {
    /// Requests pages over nodes carrying `label`.
    #[must_use]
    pub fn nodes(label: impl Into<ArcStr>) -> Self {
        Self::with_selector(Selector::NodeLabel(label.into()))
    }

    /// Requests pages over edges of `edge_type`.
    #[must_use]
    pub fn edges(edge_type: impl Into<ArcStr>) -> Self {
        Self::with_selector(Selector::EdgeType(edge_type.into()))
    }

    /// Requests pages over every node in the store.
    #[must_use]
    pub fn all_nodes() -> Self {
        Self::with_selector(Selector::AllNodes)
    }

    fn with_selector(selector: Selector) -> Self {
        Self {
            selector,
            conditions: FxHashMap::default(),
            order_by: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            cursor: None,
            forward: true,
        }
    }

    /// Adds a condition.
    #[must_use]
    pub fn with_condition(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(key.into(), value.into());
        self
    }

    /// Appends a sort clause.
    #[must_use]
    pub fn with_order_by(mut self, clause: OrderByClause) -> Self {
        self.order_by.push(clause);
        self
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Resumes from a cursor token.
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Pages backward from the cursor instead of forward.
    #[must_use]
    pub fn backward(mut self) -> Self {
        self.forward = false;
        self
    }
}

/// One page of results.
#[derive(Debug, Clone)]
pub struct Page {
    /// The items on this page, in sort order.
    pub items: Vec<GraphItem>,
    /// Token resuming after the last item, when a next page exists.
    pub next_cursor: Option<String>,
    /// Token resuming before the first item, when a previous page exists.
    pub previous_cursor: Option<String>,
    /// Whether more items follow this page.
    pub has_next: bool,
    /// Whether items precede this page.
    pub has_previous: bool,
    /// Total candidates after filtering.
    pub total_count: usize,
    /// 1-based number of this page within the sequence.
    pub page_number: usize,
    /// Total number of pages in the sequence.
    pub total_pages: usize,
    /// The page size this page was produced with.
    pub page_size: usize,
}

impl Page {
    /// The empty page: zero totals, no cursors, no flags.
    ///
    /// Returned for empty candidate sets and for any internal failure.
    #[must_use]
    pub fn empty(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
            previous_cursor: None,
            has_next: false,
            has_previous: false,
            total_count: 0,
            page_number: 1,
            total_pages: 0,
            page_size,
        }
    }
}

/// Slices filtered, sorted result sets into cursor-addressed pages.
///
/// # Example
///
/// ```no_run
/// use akcelo_core::paginate::{PageRequest, Paginator};
/// use akcelo_core::graph::GraphSource;
///
/// fn first_two_pages(store: &dyn GraphSource) {
///     let paginator = Paginator::new(store);
///     let first = paginator.paginate(&PageRequest::nodes("person").with_page_size(10));
///     if let Some(token) = first.next_cursor {
///         let second = paginator.paginate(
///             &PageRequest::nodes("person").with_page_size(10).with_cursor(token),
///         );
///         assert!(second.page_number >= 2);
///     }
/// }
/// ```
pub struct Paginator<'a> {
    source: &'a dyn GraphSource,
}

impl<'a> Paginator<'a> {
    /// Creates a paginator over the given graph store.
    #[must_use]
    pub fn new(source: &'a dyn GraphSource) -> Self {
        Self { source }
    }

    /// Produces one page for the request.
    ///
    /// Never fails: internal errors during filtering, sorting or cursor
    /// handling are logged and collapse to an empty page with the
    /// requested page size and zero totals.
    #[must_use]
    pub fn paginate(&self, request: &PageRequest) -> Page {
        match self.paginate_inner(request) {
            Ok(page) => page,
            Err(error) => {
                tracing::warn!(%error, "pagination failed; returning empty page");
                Page::empty(request.page_size)
            }
        }
    }

    fn paginate_inner(&self, request: &PageRequest) -> Result<Page> {
        let page_size = request.page_size.max(1);

        // Parse all conditions up front - an empty key is a caller
        // contract violation and propagates to the soft-fail boundary.
        let conditions = request
            .conditions
            .iter()
            .map(|(raw_key, value)| filter::parse_condition(raw_key, value))
            .collect::<Result<Vec<Condition>>>()?;

        // Candidate set: fetch, filter, sort. Materialized fresh per call.
        let mut candidates: Vec<GraphItem> = match &request.selector {
            Selector::NodeLabel(label) => self
                .source
                .nodes_with_label(label)
                .into_iter()
                .map(GraphItem::Node)
                .collect(),
            Selector::EdgeType(edge_type) => self
                .source
                .edges(Some(edge_type))
                .into_iter()
                .map(GraphItem::Edge)
                .collect(),
            Selector::AllNodes => self
                .source
                .all_nodes()
                .into_iter()
                .map(GraphItem::Node)
                .collect(),
        };

        candidates.retain(|item| {
            conditions
                .iter()
                .all(|condition| condition.matches(item.property(&condition.property)))
        });
        order::sort_items(&mut candidates, &request.order_by);

        let total = candidates.len();
        if total == 0 {
            return Ok(Page::empty(request.page_size));
        }

        let active_hash = filter::filter_hash(&request.conditions);

        // Resolve the anchor: a missing, malformed or filter-mismatched
        // cursor resumes from the start of the sequence, never an error.
        let anchor_index = request
            .cursor
            .as_deref()
            .and_then(PageCursor::decode)
            .filter(|cursor| cursor.filter_hash == active_hash)
            .and_then(|cursor| {
                candidates
                    .iter()
                    .position(|item| {
                        item.raw_id() == cursor.anchor_id && item.kind() == cursor.kind
                    })
            });

        let (start, end) = match anchor_index {
            Some(anchor) if request.forward => {
                let start = (anchor + 1).min(total);
                (start, (start + page_size).min(total))
            }
            Some(anchor) => {
                let end = anchor;
                (end.saturating_sub(page_size), end)
            }
            None => (0, page_size.min(total)),
        };

        let items: Vec<GraphItem> = candidates[start..end].to_vec();
        let has_previous = start > 0;
        let has_next = end < total;

        let next_cursor = match (has_next, items.last()) {
            (true, Some(last)) => Some(Self::cursor_for(last, request, active_hash).encode()),
            _ => None,
        };
        let previous_cursor = match (has_previous, items.first()) {
            (true, Some(first)) => Some(Self::cursor_for(first, request, active_hash).encode()),
            _ => None,
        };

        Ok(Page {
            items,
            next_cursor,
            previous_cursor,
            has_next,
            has_previous,
            total_count: total,
            page_number: start / page_size + 1,
            total_pages: total.div_ceil(page_size),
            page_size: request.page_size,
        })
    }

    /// Builds a cursor anchored on `item`.
    fn cursor_for(item: &GraphItem, request: &PageRequest, filter_hash: u64) -> PageCursor {
        let sort_snapshot: Vec<(String, Value)> = request
            .order_by
            .iter()
            .filter_map(|clause| {
                item.property(&clause.property)
                    .map(|value| (clause.property.clone(), value.clone()))
            })
            .collect();

        PageCursor {
            anchor_id: item.raw_id(),
            kind: item.kind(),
            sort_snapshot,
            page_size: request.page_size,
            filter_hash,
        }
    }
}
