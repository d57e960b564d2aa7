//! Condition parsing and evaluation for pagination.
//!
//! A condition key may embed a comparison operator as a suffix - `age>`,
//! `salary<=` - with a bare key meaning equality. Values compare
//! numerically when both operands convert to a number, otherwise as
//! case-insensitive strings. A candidate missing the referenced property
//! is excluded, and all conditions AND together.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use akcelo_common::types::Value;
use akcelo_common::utils::error::{Error, Result};
use akcelo_common::utils::hash::{FxHashMap, FxHasher};

/// A comparison operator parsed from a condition-key suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompareOp {
    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Gt => ordering == Ordering::Greater,
            Self::Lt => ordering == Ordering::Less,
            Self::Ge => ordering != Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
        }
    }
}

/// One parsed condition: property, operator, expected value.
#[derive(Debug, Clone)]
pub(crate) struct Condition {
    pub property: String,
    pub op: CompareOp,
    pub value: Value,
}

/// Parses a raw condition key (operator suffix included) and its value.
///
/// # Errors
///
/// Returns [`Error::InvalidKey`] when the property name is empty after
/// stripping the operator - a caller contract violation, not a data
/// condition.
pub(crate) fn parse_condition(raw_key: &str, value: &Value) -> Result<Condition> {
    // Two-character operators first so "age>=" does not parse as "age>" "="
    let (property, op) = if let Some(stripped) = raw_key.strip_suffix(">=") {
        (stripped, CompareOp::Ge)
    } else if let Some(stripped) = raw_key.strip_suffix("<=") {
        (stripped, CompareOp::Le)
    } else if let Some(stripped) = raw_key.strip_suffix('>') {
        (stripped, CompareOp::Gt)
    } else if let Some(stripped) = raw_key.strip_suffix('<') {
        (stripped, CompareOp::Lt)
    } else {
        (raw_key, CompareOp::Eq)
    };

    let property = property.trim();
    if property.is_empty() {
        return Err(Error::InvalidKey(format!(
            "condition key {raw_key:?} has no property name"
        )));
    }

    Ok(Condition {
        property: property.to_string(),
        op,
        value: value.clone(),
    })
}

impl Condition {
    /// Evaluates this condition against a candidate's property value.
    ///
    /// A missing property excludes the candidate.
    pub fn matches(&self, actual: Option<&Value>) -> bool {
        match actual {
            Some(actual) => self.op.accepts(compare_values(actual, &self.value)),
            None => false,
        }
    }
}

/// Compares two values the way conditions and sort keys do: numerically
/// when both operands convert to a number, otherwise as case-insensitive
/// strings.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    comparison_text(a).cmp(&comparison_text(b))
}

/// The case-insensitive text form of a value for string comparison.
pub(crate) fn comparison_text(value: &Value) -> String {
    value.to_string().to_lowercase()
}

/// Digest of a filter set, embedded in cursors.
///
/// Sorted before hashing so insertion order never changes the digest.
pub(crate) fn filter_hash(conditions: &FxHashMap<String, Value>) -> u64 {
    let sorted: BTreeMap<&String, &Value> = conditions.iter().collect();
    let mut hasher = FxHasher::default();
    for (key, value) in sorted {
        key.hash(&mut hasher);
        format!("{value:?}").hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition(raw_key: &str, value: impl Into<Value>) -> Condition {
        parse_condition(raw_key, &value.into()).unwrap()
    }

    #[test]
    fn test_operator_suffix_parsing() {
        assert_eq!(condition("age", 1i64).op, CompareOp::Eq);
        assert_eq!(condition("age>", 1i64).op, CompareOp::Gt);
        assert_eq!(condition("age<", 1i64).op, CompareOp::Lt);
        assert_eq!(condition("age>=", 1i64).op, CompareOp::Ge);
        assert_eq!(condition("age<=", 1i64).op, CompareOp::Le);
        assert_eq!(condition("age>=", 1i64).property, "age");
    }

    #[test]
    fn test_empty_property_is_contract_violation() {
        assert!(parse_condition(">", &Value::from(1i64)).is_err());
        assert!(parse_condition(">=", &Value::from(1i64)).is_err());
        assert!(parse_condition("", &Value::from(1i64)).is_err());
        assert!(parse_condition("  >", &Value::from(1i64)).is_err());
    }

    #[test]
    fn test_numeric_comparison() {
        let c = condition("age>", 21i64);
        assert!(c.matches(Some(&Value::from(22i64))));
        assert!(!c.matches(Some(&Value::from(21i64))));
        assert!(!c.matches(Some(&Value::from(20i64))));

        // Numeric strings compare numerically, not lexicographically
        assert!(c.matches(Some(&Value::from("100"))));
        assert!(!c.matches(Some(&Value::from("9"))));
    }

    #[test]
    fn test_string_comparison_is_case_insensitive() {
        let c = condition("city", "oslo");
        assert!(c.matches(Some(&Value::from("Oslo"))));
        assert!(c.matches(Some(&Value::from("OSLO"))));
        assert!(!c.matches(Some(&Value::from("Bergen"))));
    }

    #[test]
    fn test_missing_property_excludes() {
        let c = condition("age>", 21i64);
        assert!(!c.matches(None));
    }

    #[test]
    fn test_range_style_conditions() {
        let ge = condition("age>=", 21i64);
        assert!(ge.matches(Some(&Value::from(21i64))));
        assert!(ge.matches(Some(&Value::from(22i64))));
        assert!(!ge.matches(Some(&Value::from(20i64))));

        let le = condition("age<=", 21i64);
        assert!(le.matches(Some(&Value::from(21i64))));
        assert!(!le.matches(Some(&Value::from(22i64))));
    }

    #[test]
    fn test_filter_hash_is_order_independent() {
        let mut a: FxHashMap<String, Value> = FxHashMap::default();
        a.insert("age>".to_string(), Value::from(21i64));
        a.insert("city".to_string(), Value::from("Oslo"));

        let mut b: FxHashMap<String, Value> = FxHashMap::default();
        b.insert("city".to_string(), Value::from("Oslo"));
        b.insert("age>".to_string(), Value::from(21i64));

        assert_eq!(filter_hash(&a), filter_hash(&b));
    }

    #[test]
    fn test_filter_hash_differs_for_different_filters() {
        let mut a: FxHashMap<String, Value> = FxHashMap::default();
        a.insert("age>".to_string(), Value::from(21i64));

        let mut b: FxHashMap<String, Value> = FxHashMap::default();
        b.insert("age>".to_string(), Value::from(22i64));

        assert_ne!(filter_hash(&a), filter_hash(&b));
        assert_ne!(filter_hash(&a), filter_hash(&FxHashMap::default()));
    }
}
