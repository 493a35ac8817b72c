use std::collections::BTreeMap;
use std::fmt;

use super::TagValue;

/// A resolved runtime value for one tag name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    value: TagValue,
}

impl Tag {
    pub fn new(value: impl Into<TagValue>) -> Self {
        Self {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn value(&self) -> &TagValue {
        &self.value
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// The runtime tag map a condition is evaluated against. Keys are
/// unique tag names; insertion order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: BTreeMap<String, Tag>,
}

impl TagSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chaining setter for fixture-style construction.
    #[must_use]
    pub fn set(mut self, name: &str, value: impl Into<TagValue>) -> Self {
        self.add_tag(name, Tag::new(value));
        self
    }

    pub fn add_tag(&mut self, name: &str, tag: Tag) {
        self.tags.insert(name.to_owned(), tag);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.tags.get(name)
    }

    #[must_use]
    pub fn tags(&self) -> &BTreeMap<String, Tag> {
        &self.tags
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, tag) in &self.tags {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name}={tag}")?;
            first = false;
        }
        Ok(())
    }
}
