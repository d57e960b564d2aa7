//! Multi-key stable sorting for pagination.
//!
//! Later clauses break ties left by earlier ones; the underlying sort is
//! stable so candidates equal under every clause keep their store order.
//! A missing property sorts as an empty string.

use std::cmp::Ordering;

use akcelo_common::types::Value;

use super::GraphItem;
use super::filter::{compare_values, comparison_text};
use crate::graph::query::OrderByClause;

/// Sorts candidates in place by the given clauses.
pub(crate) fn sort_items(items: &mut [GraphItem], order_by: &[OrderByClause]) {
    if order_by.is_empty() {
        return;
    }
    items.sort_by(|a, b| {
        for clause in order_by {
            let ordering = compare_for_sort(
                a.property(&clause.property),
                b.property(&clause.property),
            );
            let ordering = if clause.descending {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Compares two optional property values for sorting.
///
/// Present values compare like condition operands (numeric when possible,
/// case-insensitive text otherwise); an absent value compares as "".
fn compare_for_sort(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_values(a, b),
        (Some(a), None) => comparison_text(a).cmp(&String::new()),
        (None, Some(b)) => String::new().cmp(&comparison_text(b)),
        (None, None) => Ordering::Equal,
    }
}
