use crate::cache::ConditionTreeCache;
use crate::{
    Condition, ConditionalExpression, LogicalOperator, LogicalOperatorKind, TagCondError, TagSet,
};

use super::operators::OperatorRegistry;
use super::ConditionEvaluator;

/// Tree-walking evaluator: fetches the parsed tree through the tree
/// cache and folds each node's results with its aggregation kind.
///
/// Every operand of a node is evaluated; the fold never short-circuits,
/// so an unrecognized operator anywhere in the tree surfaces as an error
/// regardless of what the other operands evaluated to.
pub struct OperatorConditionEvaluator {
    trees: ConditionTreeCache,
    registry: OperatorRegistry,
}

impl OperatorConditionEvaluator {
    #[must_use]
    pub fn new(trees: ConditionTreeCache) -> Self {
        Self {
            trees,
            registry: OperatorRegistry::default(),
        }
    }

    #[must_use]
    pub fn with_registry(trees: ConditionTreeCache, registry: OperatorRegistry) -> Self {
        Self { trees, registry }
    }

    fn walk(&self, node: &LogicalOperator, tags: &TagSet) -> Result<bool, TagCondError> {
        // A node aggregating nothing is never satisfied, for either kind.
        if node.is_empty() {
            return Ok(false);
        }
        let kind = node.kind().unwrap_or(LogicalOperatorKind::And);
        let mut acc = matches!(kind, LogicalOperatorKind::And);
        for condition in node.conditions() {
            let hit = self.apply(condition, tags)?;
            acc = fold(kind, acc, hit);
        }
        for child in node.logical_operators() {
            let hit = self.walk(child, tags)?;
            acc = fold(kind, acc, hit);
        }
        Ok(acc)
    }

    fn apply(&self, condition: &Condition, tags: &TagSet) -> Result<bool, TagCondError> {
        let operator = self.registry.get(condition.operator()).ok_or_else(|| {
            TagCondError::UnrecognizedOperator {
                symbol: condition.operator().to_owned(),
            }
        })?;
        // A tag absent from the set fails the condition without erroring.
        let Some(tag) = tags.get(condition.tag_definition().name()) else {
            return Ok(false);
        };
        Ok(operator.apply(tag.value(), condition.value()))
    }
}

fn fold(kind: LogicalOperatorKind, acc: bool, hit: bool) -> bool {
    match kind {
        LogicalOperatorKind::And => acc & hit,
        LogicalOperatorKind::Or => acc | hit,
    }
}

impl ConditionEvaluator for OperatorConditionEvaluator {
    fn evaluate(
        &self,
        expression: &ConditionalExpression,
        tags: &TagSet,
    ) -> Result<bool, TagCondError> {
        let tree = self.trees.get_tree(expression.condition_string())?;
        // No condition means the expression is always satisfied.
        let Some(root) = tree.as_ref() else {
            return Ok(true);
        };
        self.walk(root, tags)
    }
}
