use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::TagValue;

/// A named comparison between a runtime tag value and a condition
/// operand. Operators never error: a comparison that does not apply to
/// the value kinds at hand is simply not satisfied.
pub trait ConditionOperator: Send + Sync {
    fn apply(&self, tag_value: &TagValue, operand: &TagValue) -> bool;
}

struct EqualTo;

impl ConditionOperator for EqualTo {
    fn apply(&self, tag_value: &TagValue, operand: &TagValue) -> bool {
        tag_value == operand
    }
}

struct NotEqualTo;

impl ConditionOperator for NotEqualTo {
    fn apply(&self, tag_value: &TagValue, operand: &TagValue) -> bool {
        tag_value != operand
    }
}

/// Ordering-based operators share one implementation parameterized by
/// which orderings they accept. Cross-kind comparisons yield `None` and
/// are never satisfied.
struct Ordered {
    accept: fn(Ordering) -> bool,
}

impl ConditionOperator for Ordered {
    fn apply(&self, tag_value: &TagValue, operand: &TagValue) -> bool {
        tag_value
            .partial_cmp_value(operand)
            .is_some_and(self.accept)
    }
}

/// Substring matching over string values. Non-string inputs are never
/// satisfied, including for the negated form.
struct Includes {
    negate: bool,
    ignore_case: bool,
}

impl ConditionOperator for Includes {
    fn apply(&self, tag_value: &TagValue, operand: &TagValue) -> bool {
        let (TagValue::String(haystack), TagValue::String(needle)) = (tag_value, operand) else {
            return false;
        };
        let found = if self.ignore_case {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        } else {
            haystack.contains(needle.as_str())
        };
        found != self.negate
    }
}

struct EqualsIgnoreCase;

impl ConditionOperator for EqualsIgnoreCase {
    fn apply(&self, tag_value: &TagValue, operand: &TagValue) -> bool {
        let (TagValue::String(a), TagValue::String(b)) = (tag_value, operand) else {
            return false;
        };
        a.to_lowercase() == b.to_lowercase()
    }
}

/// Operator lookup by DSL symbol. The default registry carries the
/// built-in operator set plus the short aliases `eq`, `neq`, and
/// `contains`; custom operators can be registered on top.
pub struct OperatorRegistry {
    operators: HashMap<String, Arc<dyn ConditionOperator>>,
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        let equal_to: Arc<dyn ConditionOperator> = Arc::new(EqualTo);
        let not_equal_to: Arc<dyn ConditionOperator> = Arc::new(NotEqualTo);
        let includes: Arc<dyn ConditionOperator> = Arc::new(Includes {
            negate: false,
            ignore_case: false,
        });

        let mut registry = Self {
            operators: HashMap::new(),
        };
        registry.insert("equalTo", Arc::clone(&equal_to));
        registry.insert("eq", equal_to);
        registry.insert("notEqualTo", Arc::clone(&not_equal_to));
        registry.insert("neq", not_equal_to);
        registry.insert(
            "lessThan",
            Arc::new(Ordered {
                accept: Ordering::is_lt,
            }),
        );
        registry.insert(
            "lessThanOrEqualTo",
            Arc::new(Ordered {
                accept: Ordering::is_le,
            }),
        );
        registry.insert(
            "greaterThan",
            Arc::new(Ordered {
                accept: Ordering::is_gt,
            }),
        );
        registry.insert(
            "greaterThanOrEqualTo",
            Arc::new(Ordered {
                accept: Ordering::is_ge,
            }),
        );
        registry.insert("includes", Arc::clone(&includes));
        registry.insert("contains", includes);
        registry.insert(
            "notIncludes",
            Arc::new(Includes {
                negate: true,
                ignore_case: false,
            }),
        );
        registry.insert(
            "includesIgnoreCase",
            Arc::new(Includes {
                negate: false,
                ignore_case: true,
            }),
        );
        registry.insert("equalsIgnoreCase", Arc::new(EqualsIgnoreCase));
        registry
    }
}

impl OperatorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with no operators at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            operators: HashMap::new(),
        }
    }

    fn insert(&mut self, symbol: &str, operator: Arc<dyn ConditionOperator>) {
        self.operators.insert(symbol.to_owned(), operator);
    }

    /// Chaining registration; replaces any existing binding for `symbol`.
    #[must_use]
    pub fn register(mut self, symbol: &str, operator: Arc<dyn ConditionOperator>) -> Self {
        self.insert(symbol, operator);
        self
    }

    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&Arc<dyn ConditionOperator>> {
        self.operators.get(symbol)
    }
}
