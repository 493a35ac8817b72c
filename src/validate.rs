use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{Condition, LogicalOperator, TagCondError, TagValue, ValueKind};

/// Accumulated outcome of validating one or more conditions. Valid when
/// no errors were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<String>,
}

impl ValidationResult {
    #[must_use]
    pub fn valid() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Fold another result into this one, keeping every error.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "valid")
        } else {
            write!(f, "{}", self.errors.join("; "))
        }
    }
}

/// Pluggable per-condition validator. Implementations inspect a single
/// condition and report any violations; tree walking stays in the facade.
pub trait ConditionValidator: Send + Sync {
    fn validate(&self, condition: &Condition) -> ValidationResult;
}

/// Validates a condition's operand against the tag's declared value type
/// and its declared constraints (`min` and `max` for numeric kinds,
/// `maxLength` for strings). Unknown constraint names are ignored so that
/// directories can carry constraints aimed at other validators.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintValidator;

impl ConditionValidator for ConstraintValidator {
    fn validate(&self, condition: &Condition) -> ValidationResult {
        let definition = condition.tag_definition();
        let Some(value_type) = definition.value_type() else {
            return ValidationResult::invalid(format!(
                "tag '{}' has no declared value type",
                definition.name()
            ));
        };

        let mut result = ValidationResult::valid();
        let value = condition.value();
        if value.kind() != value_type.kind() {
            result.add_error(format!(
                "operand kind {} does not match declared kind {} for tag '{}'",
                value.kind(),
                value_type.kind(),
                definition.name()
            ));
            return result;
        }

        for constraint in value_type.constraints() {
            match constraint.name() {
                "min" => {
                    if let Some(bound) = parse_bound(constraint.value(), value.kind()) {
                        if value.partial_cmp_value(&bound) == Some(Ordering::Less) {
                            result.add_error(format!(
                                "value {} for tag '{}' is below the minimum {}",
                                value,
                                definition.name(),
                                constraint.value()
                            ));
                        }
                    }
                }
                "max" => {
                    if let Some(bound) = parse_bound(constraint.value(), value.kind()) {
                        if value.partial_cmp_value(&bound) == Some(Ordering::Greater) {
                            result.add_error(format!(
                                "value {} for tag '{}' is above the maximum {}",
                                value,
                                definition.name(),
                                constraint.value()
                            ));
                        }
                    }
                }
                "maxLength" => {
                    if let (TagValue::String(s), Ok(limit)) =
                        (value, constraint.value().parse::<usize>())
                    {
                        if s.chars().count() > limit {
                            result.add_error(format!(
                                "value for tag '{}' exceeds the maximum length {}",
                                definition.name(),
                                limit
                            ));
                        }
                    }
                }
                _ => {}
            }
        }
        result
    }
}

fn parse_bound(text: &str, kind: ValueKind) -> Option<TagValue> {
    match kind {
        ValueKind::Int => text.parse::<i32>().ok().map(TagValue::Int),
        ValueKind::Long => text.parse::<i64>().ok().map(TagValue::Long),
        ValueKind::Float => text.parse::<f32>().ok().map(TagValue::Float),
        ValueKind::Decimal => Decimal::from_str(text).ok().map(TagValue::Decimal),
        ValueKind::Bool | ValueKind::String => None,
    }
}

/// Walks a condition tree and runs every registered validator against
/// every condition, merging the results.
pub struct ConditionValidationFacade {
    validators: Vec<Box<dyn ConditionValidator>>,
}

impl Default for ConditionValidationFacade {
    fn default() -> Self {
        Self {
            validators: vec![Box::new(ConstraintValidator)],
        }
    }
}

impl ConditionValidationFacade {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A facade with no validators; every tree passes.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_validator(mut self, validator: Box<dyn ConditionValidator>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Validate every condition in the tree.
    ///
    /// # Errors
    ///
    /// Returns [`TagCondError::InvalidArgument`] when `tree` is `None`;
    /// absence of a tree is a caller bug, not a validation finding.
    pub fn validate_tree(
        &self,
        tree: Option<&LogicalOperator>,
    ) -> Result<ValidationResult, TagCondError> {
        let tree = tree.ok_or_else(|| {
            TagCondError::InvalidArgument("no condition tree to validate".into())
        })?;
        let mut result = ValidationResult::valid();
        self.walk(tree, &mut result);
        Ok(result)
    }

    fn walk(&self, node: &LogicalOperator, result: &mut ValidationResult) {
        for condition in node.conditions() {
            for validator in &self.validators {
                result.merge(validator.validate(condition));
            }
        }
        for child in node.logical_operators() {
            self.walk(child, result);
        }
    }
}
