use std::fmt;

/// A stored conditional expression: identity plus its DSL text.
///
/// The engine treats the condition string as opaque until it is parsed;
/// the guid participates in evaluation-result cache keys so that two
/// expressions with identical text still cache independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConditionalExpression {
    guid: String,
    name: String,
    condition_string: String,
}

impl ConditionalExpression {
    pub fn new(
        guid: impl Into<String>,
        name: impl Into<String>,
        condition_string: impl Into<String>,
    ) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
            condition_string: condition_string.into(),
        }
    }

    #[must_use]
    pub fn guid(&self) -> &str {
        &self.guid
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn condition_string(&self) -> &str {
        &self.condition_string
    }
}

impl fmt::Display for ConditionalExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.guid)
    }
}
