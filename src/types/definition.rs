use std::collections::HashMap;
use std::sync::Arc;

use super::ValueKind;

/// A named validation constraint attached to a tag value type.
///
/// Constraints are declared data; interpreting them is the job of the
/// injected [`ConditionValidator`](crate::ConditionValidator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    name: String,
    value: String,
}

impl Constraint {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// The declared literal type of a tag plus its validation constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValueType {
    kind: ValueKind,
    constraints: Vec<Constraint>,
}

impl TagValueType {
    #[must_use]
    pub fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            constraints: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_constraint(mut self, name: &str, value: &str) -> Self {
        self.constraints.push(Constraint::new(name, value));
        self
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

/// A tag as declared by the tag directory: identity plus value type.
/// Read-only at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDefinition {
    guid: String,
    name: String,
    value_type: Option<TagValueType>,
}

impl TagDefinition {
    pub fn new(guid: impl Into<String>, name: impl Into<String>, value_type: TagValueType) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
            value_type: Some(value_type),
        }
    }

    /// A definition without a declared value type. The condition builder
    /// rejects these; they exist because the directory may hold
    /// partially-authored definitions.
    pub fn untyped(guid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
            value_type: None,
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
    pub fn value_type(&self) -> Option<&TagValueType> {
        self.value_type.as_ref()
    }
}

/// The external tag directory. Serialized DSL text identifies tags by
/// guid while programmatic callers use names, so both lookups are part
/// of the contract.
pub trait TagDictionary: Send + Sync {
    fn find_definition_by_name(&self, name: &str) -> Option<Arc<TagDefinition>>;

    fn find_definition_by_guid(&self, guid: &str) -> Option<Arc<TagDefinition>>;
}

/// In-memory [`TagDictionary`] for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTagDictionary {
    by_name: HashMap<String, Arc<TagDefinition>>,
    by_guid: HashMap<String, Arc<TagDefinition>>,
}

impl InMemoryTagDictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chaining helper that registers a definition under both its name
    /// and its guid.
    #[must_use]
    pub fn define(mut self, definition: TagDefinition) -> Self {
        let definition = Arc::new(definition);
        self.by_name
            .insert(definition.name().to_owned(), Arc::clone(&definition));
        self.by_guid
            .insert(definition.guid().to_owned(), definition);
        self
    }

    /// Shorthand for a simple typed tag whose guid equals its name.
    #[must_use]
    pub fn define_simple(self, name: &str, kind: ValueKind) -> Self {
        self.define(TagDefinition::new(name, name, TagValueType::new(kind)))
    }
}

impl TagDictionary for InMemoryTagDictionary {
    fn find_definition_by_name(&self, name: &str) -> Option<Arc<TagDefinition>> {
        self.by_name.get(name).cloned()
    }

    fn find_definition_by_guid(&self, guid: &str) -> Option<Arc<TagDefinition>> {
        self.by_guid.get(guid).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        let dict = InMemoryTagDictionary::new().define_simple("age", ValueKind::Int);
        let def = dict.find_definition_by_name("age").unwrap();
        assert_eq!(def.guid(), "age");
        assert_eq!(def.name(), "age");
        assert_eq!(def.value_type().unwrap().kind(), ValueKind::Int);
    }

    #[test]
    fn lookup_unknown_returns_none() {
        let dict = InMemoryTagDictionary::new();
        assert!(dict.find_definition_by_name("nope").is_none());
    }

    #[test]
    fn untyped_definition_has_no_value_type() {
        let def = TagDefinition::untyped("g1", "legacy");
        assert!(def.value_type().is_none());
    }

    #[test]
    fn constraints_are_carried() {
        let vt = TagValueType::new(ValueKind::String)
            .with_constraint("maxLength", "10")
            .with_constraint("minLength", "2");
        assert_eq!(vt.constraints().len(), 2);
        assert_eq!(vt.constraints()[0].name(), "maxLength");
        assert_eq!(vt.constraints()[0].value(), "10");
    }

    #[test]
    fn guid_and_name_can_differ() {
        let def = TagDefinition::new(
            "TAG_SHOPPER_LOCALE",
            "shopperLocale",
            TagValueType::new(ValueKind::String),
        );
        assert_eq!(def.guid(), "TAG_SHOPPER_LOCALE");
        assert_eq!(def.name(), "shopperLocale");
    }

    #[test]
    fn lookup_by_guid() {
        let dict = InMemoryTagDictionary::new().define(TagDefinition::new(
            "TAG_SHOPPER_LOCALE",
            "shopperLocale",
            TagValueType::new(ValueKind::String),
        ));
        let def = dict.find_definition_by_guid("TAG_SHOPPER_LOCALE").unwrap();
        assert_eq!(def.name(), "shopperLocale");
        assert!(dict.find_definition_by_name("TAG_SHOPPER_LOCALE").is_none());
        assert!(dict.find_definition_by_name("shopperLocale").is_some());
    }
}
