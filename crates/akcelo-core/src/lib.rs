//! # akcelo-core
//!
//! Query-acceleration core for an embedded graph database: secondary
//! property indexes, an adaptive query-result cache, and cursor-based
//! pagination. An external query executor consumes all three together.
//!
//! This crate owns no graph data. Nodes and edges live in the underlying
//! graph store, reached through the [`graph::GraphSource`] trait; mutation
//! paths are expected to call the index update hooks and the cache
//! invalidation hook synchronously as part of each mutation.
//!
//! ## Modules
//!
//! - [`graph`] - Item views, the graph-source trait, and the query description
//! - [`index`] - Secondary property indexes ([`PropertyIndexes`])
//! - [`cache`] - Query result cache ([`QueryCache`])
//! - [`paginate`] - Cursor-based pagination ([`Paginator`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cache;
pub mod graph;
pub mod index;
pub mod paginate;

// Re-export commonly used types
pub use cache::{CacheConfig, MutationKind, QueryCache};
pub use graph::query::{OrderByClause, QueryKind, QueryResult, QuerySpec};
pub use graph::{Edge, GraphSource, Node};
pub use index::PropertyIndexes;
pub use paginate::{Page, PageRequest, Paginator, Selector};
