mod builder;
mod cache;
mod error;
mod evaluate;
pub mod parse;
mod serial;
mod types;
mod validate;

pub use builder::ConditionBuilder;
pub use cache::{Cache, ConditionTreeCache, MemoCache, MemoryCache};
pub use error::TagCondError;
pub use evaluate::{
    CompiledPredicate, ConditionEvaluator, ConditionOperator, ConditionProcessingService,
    EvaluationCacheKey, OperatorConditionEvaluator, OperatorRegistry, ScriptConditionEvaluator,
};
pub use serial::ConditionDslSerializer;
pub use types::{
    Condition, ConditionalExpression, Constraint, InMemoryTagDictionary, LogicalOperator,
    LogicalOperatorKind, Tag, TagDefinition, TagDictionary, TagSet, TagValue, TagValueType,
    ValueKind,
};
pub use validate::{
    ConditionValidationFacade, ConditionValidator, ConstraintValidator, ValidationResult,
};
