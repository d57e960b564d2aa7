//! Opaque pagination cursors.
//!
//! A cursor is inert data: a serialized record of where a page ended, not
//! a reference into live storage. Encoding is bincode wrapped in URL-safe
//! base64 so tokens can travel through query strings untouched.
//!
//! Decoding is total. Any malformed token - bad base64, truncated bytes,
//! foreign payload - maps to `None`, which the paginator treats as "no
//! cursor supplied". A decode can never surface an error to the caller.

use akcelo_common::types::Value;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Whether a cursor anchors on a node or an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// The anchor is a node.
    Node,
    /// The anchor is an edge.
    Edge,
}

/// The decoded contents of a pagination cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageCursor {
    /// Identifier of the anchor item the page ended on.
    pub anchor_id: u64,
    /// Whether the anchor is a node or an edge.
    pub kind: ItemKind,
    /// The anchor's sort-relevant property values at mint time.
    pub sort_snapshot: Vec<(String, Value)>,
    /// The page size used to produce this cursor.
    pub page_size: usize,
    /// Digest of the filter set active when the cursor was minted.
    ///
    /// A later request presenting this cursor under a different filter
    /// set is resumed from the start of the sequence instead of splicing
    /// two unrelated sequences together.
    pub filter_hash: u64,
}

impl PageCursor {
    /// Renders this cursor as an opaque token.
    #[must_use]
    pub fn encode(&self) -> String {
        let bytes = bincode::serde::encode_to_vec(self, bincode::config::standard())
            .expect("cursor serialization should not fail");
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Decodes a token back into a cursor.
    ///
    /// Total: any failure yields `None`, never an error.
    #[must_use]
    pub fn decode(token: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
        bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
            .ok()
            .map(|(cursor, _)| cursor)
    }
}
