//! Canonical cache-key generation.
//!
//! A cache key is a deterministic string encoding of a query's shape.
//! Two requirements pull in opposite directions and both are met here:
//!
//! 1. Semantically identical queries must collide: the property and
//!    condition maps are serialized with keys sorted lexicographically,
//!    so insertion order never leaks into the key.
//! 2. Structurally different queries must NEVER collide: every field is
//!    written as a tagged segment and all free-form text (labels, map
//!    keys, string values) is rendered through `Debug`, whose escaping
//!    makes the encoding prefix-unambiguous. A collision here would serve
//!    wrong results, which is a correctness bug rather than a performance
//!    one.
//!
//! The tagged segments also let the invalidation policy parse the kind
//! and label back out of a stored key without keeping the original
//! [`QuerySpec`] around.

use std::collections::BTreeMap;

use akcelo_common::types::Value;

use crate::graph::query::{QueryKind, QuerySpec};

/// Derives the canonical cache key for a query description.
#[must_use]
pub fn canonical_key(query: &QuerySpec) -> String {
    let mut segments: Vec<String> = Vec::with_capacity(11);

    segments.push(match query.kind {
        Some(kind) => format!("kind={}", kind.tag()),
        None => "kind=none".to_string(),
    });
    segments.push(format!("label={:?}", query.label.as_deref()));
    segments.push(format!("etype={:?}", query.edge_type.as_deref()));
    segments.push(format!("src={:?}", query.source));
    segments.push(format!("dst={:?}", query.target));
    segments.push(format!("props={}", sorted_map(query.properties.iter())));
    segments.push(format!("conds={}", sorted_map(query.conditions.iter())));
    segments.push(format!("limit={:?}", query.limit));
    segments.push(format!("offset={:?}", query.offset));
    segments.push(format!("group={:?}", query.group_by));

    let order: Vec<String> = query
        .order_by
        .iter()
        .map(|clause| {
            format!(
                "{:?} {}",
                clause.property,
                if clause.descending { "desc" } else { "asc" }
            )
        })
        .collect();
    segments.push(format!("order=[{}]", order.join(",")));

    segments.join(";")
}

/// Renders a property/condition map with lexicographically sorted keys.
fn sorted_map<'a>(entries: impl Iterator<Item = (&'a String, &'a Value)>) -> String {
    let sorted: BTreeMap<&String, &Value> = entries.collect();
    let parts: Vec<String> = sorted
        .into_iter()
        .map(|(k, v)| format!("{k:?}={v:?}"))
        .collect();
    format!("{{{}}}", parts.join(","))
}

/// The exact segment a key carries when it references `label`.
///
/// Used by the invalidation policy for containment matching. A string
/// property value that happens to embed the same text can only cause an
/// extra invalidation, never a missed one.
pub(crate) fn label_segment(label: &str) -> String {
    format!("label={:?}", Some(label))
}

/// Parses the query kind back out of a canonical key.
///
/// Returns `None` for keys not produced by [`canonical_key`]; the
/// invalidation policy treats those as affected by everything.
pub(crate) fn kind_of_key(key: &str) -> Option<QueryKind> {
    let rest = key.strip_prefix("kind=")?;
    let tag = rest.split(';').next()?;
    QueryKind::from_tag(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use akcelo_common::types::NodeId;
    use crate::graph::query::OrderByClause;

    #[test]
    fn test_key_is_order_independent_over_maps() {
        let a = QuerySpec::new(QueryKind::FindNodes)
            .with_label("person")
            .with_property("name", Value::from("Alice"))
            .with_property("city", Value::from("Oslo"))
            .with_condition("age>", Value::from(21i64))
            .with_condition("salary<", Value::from(90_000i64));

        let b = QuerySpec::new(QueryKind::FindNodes)
            .with_label("person")
            .with_condition("salary<", Value::from(90_000i64))
            .with_condition("age>", Value::from(21i64))
            .with_property("city", Value::from("Oslo"))
            .with_property("name", Value::from("Alice"));

        assert_eq!(canonical_key(&a), canonical_key(&b));
    }

    #[test]
    fn test_structurally_different_queries_differ() {
        let base = QuerySpec::new(QueryKind::FindNodes).with_label("person");
        let variants = vec![
            QuerySpec::new(QueryKind::CountNodes).with_label("person"),
            QuerySpec::new(QueryKind::FindNodes).with_label("company"),
            QuerySpec::new(QueryKind::FindNodes)
                .with_label("person")
                .with_limit(10),
            QuerySpec::new(QueryKind::FindNodes)
                .with_label("person")
                .with_offset(10),
            QuerySpec::new(QueryKind::FindNodes)
                .with_label("person")
                .with_property("age", Value::from(30i64)),
            QuerySpec::new(QueryKind::FindNodes)
                .with_label("person")
                .with_condition("age", Value::from(30i64)),
            QuerySpec::new(QueryKind::FindNodes)
                .with_label("person")
                .with_order_by(OrderByClause::asc("age")),
            QuerySpec::new(QueryKind::FindNodes)
                .with_label("person")
                .with_group_by("age"),
        ];

        let base_key = canonical_key(&base);
        let mut keys = vec![base_key];
        for variant in &variants {
            keys.push(canonical_key(variant));
        }
        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                assert_ne!(keys[i], keys[j], "keys {i} and {j} collided");
            }
        }
    }

    #[test]
    fn test_order_by_direction_and_sequence_matter() {
        let asc = QuerySpec::new(QueryKind::FindNodes).with_order_by(OrderByClause::asc("age"));
        let desc = QuerySpec::new(QueryKind::FindNodes).with_order_by(OrderByClause::desc("age"));
        assert_ne!(canonical_key(&asc), canonical_key(&desc));

        let ab = QuerySpec::new(QueryKind::FindNodes)
            .with_order_by(OrderByClause::asc("a"))
            .with_order_by(OrderByClause::asc("b"));
        let ba = QuerySpec::new(QueryKind::FindNodes)
            .with_order_by(OrderByClause::asc("b"))
            .with_order_by(OrderByClause::asc("a"));
        assert_ne!(canonical_key(&ab), canonical_key(&ba));
    }

    #[test]
    fn test_adversarial_values_do_not_collide() {
        // A property value crafted to look like another key's segments
        // must stay inside its quoted, escaped rendering.
        let tricky = QuerySpec::new(QueryKind::FindNodes)
            .with_property("a", Value::from(r#"x";limit=Some(1);"#));
        let plain = QuerySpec::new(QueryKind::FindNodes)
            .with_property("a", Value::from("x"))
            .with_limit(1);
        assert_ne!(canonical_key(&tricky), canonical_key(&plain));
    }

    #[test]
    fn test_endpoints_in_key() {
        let a = QuerySpec::new(QueryKind::FindPath)
            .with_endpoints(NodeId::new(1), NodeId::new(2));
        let b = QuerySpec::new(QueryKind::FindPath)
            .with_endpoints(NodeId::new(2), NodeId::new(1));
        assert_ne!(canonical_key(&a), canonical_key(&b));
    }

    #[test]
    fn test_kind_of_key_roundtrip() {
        let query = QuerySpec::new(QueryKind::Aggregate).with_label("person");
        let key = canonical_key(&query);
        assert_eq!(kind_of_key(&key), Some(QueryKind::Aggregate));
        assert_eq!(kind_of_key("garbage"), None);
    }

    #[test]
    fn test_label_segment_matches_generated_key() {
        let query = QuerySpec::new(QueryKind::FindNodes).with_label("person");
        let key = canonical_key(&query);
        assert!(key.contains(&label_segment("person")));
        assert!(!key.contains(&label_segment("personnel")));
    }
}
