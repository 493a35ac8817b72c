use std::fmt;
use std::sync::Arc;

use super::{TagDefinition, TagValue};

/// A single leaf predicate: tag, operator symbol, literal operand.
///
/// Built either by the [`ConditionBuilder`](crate::ConditionBuilder), which
/// enforces the declared-type invariant, or by the parser from DSL text.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    tag_definition: Arc<TagDefinition>,
    operator: String,
    value: TagValue,
}

impl Condition {
    pub fn new(
        tag_definition: Arc<TagDefinition>,
        operator: impl Into<String>,
        value: TagValue,
    ) -> Self {
        Self {
            tag_definition,
            operator: operator.into(),
            value,
        }
    }

    #[must_use]
    pub fn tag_definition(&self) -> &Arc<TagDefinition> {
        &self.tag_definition
    }

    #[must_use]
    pub fn operator(&self) -> &str {
        &self.operator
    }

    #[must_use]
    pub fn value(&self) -> &TagValue {
        &self.value
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} {}",
            self.tag_definition.guid(),
            self.operator,
            self.value
        )
    }
}

/// The two aggregation kinds of the DSL. Negation is not a first-class
/// kind; conditions express it through negated operators such as
/// `notEqualTo` and `notIncludes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperatorKind {
    And,
    Or,
}

impl fmt::Display for LogicalOperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperatorKind::And => write!(f, "AND"),
            LogicalOperatorKind::Or => write!(f, "OR"),
        }
    }
}

/// One node of a condition tree: an aggregation kind, the conditions it
/// directly owns, and nested operator children. Each node is owned by
/// exactly one parent (or is the root), so the tree cannot contain cycles.
/// Trees are immutable snapshots once parsed; mutation happens only while
/// a tree is being assembled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogicalOperator {
    kind: Option<LogicalOperatorKind>,
    conditions: Vec<Condition>,
    operators: Vec<LogicalOperator>,
}

impl LogicalOperator {
    #[must_use]
    pub fn new(kind: LogicalOperatorKind) -> Self {
        Self {
            kind: Some(kind),
            conditions: Vec::new(),
            operators: Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Option<LogicalOperatorKind> {
        self.kind
    }

    pub fn add_condition(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    pub fn add_operator(&mut self, operator: LogicalOperator) {
        self.operators.push(operator);
    }

    /// Chaining variant of [`add_condition`](Self::add_condition).
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.add_condition(condition);
        self
    }

    /// Chaining variant of [`add_operator`](Self::add_operator).
    #[must_use]
    pub fn with_operator(mut self, operator: LogicalOperator) -> Self {
        self.add_operator(operator);
        self
    }

    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    #[must_use]
    pub fn logical_operators(&self) -> &[LogicalOperator] {
        &self.operators
    }

    /// A node with no conditions and no children aggregates nothing and
    /// is never satisfied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.operators.is_empty()
    }
}
