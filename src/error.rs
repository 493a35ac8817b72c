use thiserror::Error;

use crate::parse::ParseError;
use crate::validate::ValidationResult;

/// Unified error type covering construction, parsing, validation, and
/// evaluation of conditions.
#[derive(Debug, Error)]
pub enum TagCondError {
    /// A caller passed arguments the engine cannot work with, such as a
    /// literal that does not match the tag's declared type.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A serialization request was made for a tree that fails validation.
    #[error("invalid condition tree: {0}")]
    InvalidConditionTree(ValidationResult),

    /// A condition names an operator the registry does not know.
    #[error("unrecognized operator '{symbol}'")]
    UnrecognizedOperator { symbol: String },

    /// Evaluation of an expression failed. Carries enough context to
    /// identify the expression and the tag set it was evaluated against.
    #[error("evaluation of expression '{expression}' against tags [{tags}] failed: {reason}")]
    Evaluation {
        expression: String,
        tags: String,
        reason: String,
    },
}
