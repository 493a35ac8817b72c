//! Evaluation strategies. Both walk the same logical semantics: AND
//! nodes fold from true, OR nodes from false, every operand is visited,
//! and a tag missing from the set fails its condition without erroring.

mod operator;
mod operators;
mod script;

pub use operator::OperatorConditionEvaluator;
pub use operators::{ConditionOperator, OperatorRegistry};
pub use script::{
    CompiledPredicate, ConditionProcessingService, EvaluationCacheKey, ScriptConditionEvaluator,
};

use crate::{ConditionalExpression, TagCondError, TagSet};

/// Common contract of the evaluation strategies.
pub trait ConditionEvaluator: Send + Sync {
    /// Decide whether `expression` is satisfied by `tags`. An expression
    /// with an empty condition string is always satisfied.
    ///
    /// # Errors
    ///
    /// Returns an error when the condition cannot be parsed or names an
    /// operator the evaluator does not know.
    fn evaluate(
        &self,
        expression: &ConditionalExpression,
        tags: &TagSet,
    ) -> Result<bool, TagCondError>;
}
