//! Core data model: tag values, runtime tag sets, directory-declared tag
//! definitions, condition trees, and stored expressions.

mod condition;
mod definition;
mod expression;
mod tag;
mod value;

pub use condition::{Condition, LogicalOperator, LogicalOperatorKind};
pub use definition::{
    Constraint, InMemoryTagDictionary, TagDefinition, TagDictionary, TagValueType,
};
pub use expression::ConditionalExpression;
pub use tag::{Tag, TagSet};
pub use value::{TagValue, ValueKind};
