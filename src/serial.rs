use std::fmt::Write as _;

use crate::validate::ConditionValidationFacade;
use crate::{Condition, LogicalOperator, LogicalOperatorKind, TagCondError, TagValue};

/// Renders a condition tree back to its canonical DSL form.
///
/// The output spacing is fixed so that stored condition strings compare
/// byte-for-byte: every node and condition is wrapped in `" { "` and
/// `" } "`, non-string literals are parenthesized and suffixed by kind.
pub struct ConditionDslSerializer {
    validation: ConditionValidationFacade,
}

impl Default for ConditionDslSerializer {
    fn default() -> Self {
        Self {
            validation: ConditionValidationFacade::new(),
        }
    }
}

impl ConditionDslSerializer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_validation(validation: ConditionValidationFacade) -> Self {
        Self { validation }
    }

    /// Serialize a tree to DSL text. `None` serializes to the empty
    /// string, the canonical form of "no condition".
    ///
    /// # Errors
    ///
    /// Returns [`TagCondError::InvalidConditionTree`] when the tree fails
    /// validation; invalid trees must never reach storage.
    pub fn serialize(&self, tree: Option<&LogicalOperator>) -> Result<String, TagCondError> {
        let Some(tree) = tree else {
            return Ok(String::new());
        };
        let result = self.validation.validate_tree(Some(tree))?;
        if !result.is_valid() {
            return Err(TagCondError::InvalidConditionTree(result));
        }
        let mut out = String::new();
        write_node(&mut out, tree);
        Ok(out)
    }
}

fn write_node(out: &mut String, node: &LogicalOperator) {
    out.push_str(" { ");
    match node.kind() {
        Some(LogicalOperatorKind::And) | None => out.push_str("AND"),
        Some(LogicalOperatorKind::Or) => out.push_str("OR"),
    }
    for condition in node.conditions() {
        write_condition(out, condition);
    }
    for child in node.logical_operators() {
        write_node(out, child);
    }
    out.push_str(" } ");
}

fn write_condition(out: &mut String, condition: &Condition) {
    let _ = write!(
        out,
        " {{ {}.{} {} }} ",
        condition.tag_definition().guid(),
        condition.operator(),
        render_literal(condition.value())
    );
}

fn render_literal(value: &TagValue) -> String {
    match value {
        TagValue::Int(v) => format!("({v}i)"),
        TagValue::Long(v) => format!("({v}L)"),
        TagValue::Float(v) => format!("({v}F)"),
        TagValue::Decimal(v) => {
            let text = v.to_string();
            if text.contains('.') {
                format!("({text}G)")
            } else {
                format!("({text}.0G)")
            }
        }
        TagValue::Bool(v) => format!("({v})"),
        TagValue::String(v) => {
            let escaped = v.replace('\\', r"\\").replace('\'', r"\'");
            format!("'{escaped}'")
        }
    }
}
