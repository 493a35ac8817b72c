use std::sync::Arc;

use crate::{Condition, TagCondError, TagDictionary, TagValue};

/// Builds [`Condition`]s programmatically, enforcing the invariants the
/// parser's resolution pass leaves to the validator: the tag must be
/// known, typed, and the operand must match its declared kind.
pub struct ConditionBuilder {
    dictionary: Arc<dyn TagDictionary>,
}

impl ConditionBuilder {
    #[must_use]
    pub fn new(dictionary: Arc<dyn TagDictionary>) -> Self {
        Self { dictionary }
    }

    /// Build a single condition for `tag_name`.
    ///
    /// # Errors
    ///
    /// Returns [`TagCondError::InvalidArgument`] if the tag is unknown,
    /// has no declared value type, the operator is blank, or the operand
    /// kind does not match the declared kind.
    pub fn build(
        &self,
        tag_name: &str,
        operator: &str,
        value: impl Into<TagValue>,
    ) -> Result<Condition, TagCondError> {
        if tag_name.trim().is_empty() {
            return Err(TagCondError::InvalidArgument(
                "tag name must not be blank".into(),
            ));
        }
        if operator.trim().is_empty() {
            return Err(TagCondError::InvalidArgument(
                "operator must not be blank".into(),
            ));
        }
        let definition = self
            .dictionary
            .find_definition_by_name(tag_name)
            .ok_or_else(|| TagCondError::InvalidArgument(format!("unknown tag '{tag_name}'")))?;
        let value_type = definition.value_type().ok_or_else(|| {
            TagCondError::InvalidArgument(format!("tag '{tag_name}' has no declared value type"))
        })?;
        let value = value.into();
        if value.kind() != value_type.kind() {
            return Err(TagCondError::InvalidArgument(format!(
                "operand kind {} does not match declared kind {} for tag '{tag_name}'",
                value.kind(),
                value_type.kind()
            )));
        }
        Ok(Condition::new(definition, operator, value))
    }
}
