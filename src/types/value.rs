use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use rust_decimal::Decimal;

/// The declared literal type of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Long,
    Float,
    Decimal,
    Bool,
    String,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Int => "int",
            ValueKind::Long => "long",
            ValueKind::Float => "float",
            ValueKind::Decimal => "decimal",
            ValueKind::Bool => "bool",
            ValueKind::String => "string",
        };
        write!(f, "{name}")
    }
}

/// A typed tag value: the literal domain of the condition DSL.
///
/// Each variant maps to one literal form of the DSL grammar (`3i`, `3L`,
/// `2.2F`, `100.0G`, `true`/`false`, quoted strings).
#[derive(Debug, Clone)]
pub enum TagValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Decimal(Decimal),
    Bool(bool),
    String(String),
}

impl TagValue {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            TagValue::Int(_) => ValueKind::Int,
            TagValue::Long(_) => ValueKind::Long,
            TagValue::Float(_) => ValueKind::Float,
            TagValue::Decimal(_) => ValueKind::Decimal,
            TagValue::Bool(_) => ValueKind::Bool,
            TagValue::String(_) => ValueKind::String,
        }
    }

    /// Natural ordering between two values of the same kind.
    /// Returns `None` for cross-kind comparisons; callers treat that as a
    /// failed (never erroring) comparison. Bools order `false < true`.
    #[must_use]
    pub fn partial_cmp_value(&self, other: &TagValue) -> Option<Ordering> {
        match (self, other) {
            (TagValue::Int(a), TagValue::Int(b)) => a.partial_cmp(b),
            (TagValue::Long(a), TagValue::Long(b)) => a.partial_cmp(b),
            (TagValue::Float(a), TagValue::Float(b)) => a.partial_cmp(b),
            (TagValue::Decimal(a), TagValue::Decimal(b)) => a.partial_cmp(b),
            (TagValue::Bool(a), TagValue::Bool(b)) => a.partial_cmp(b),
            (TagValue::String(a), TagValue::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

// Equality and hashing must stay consistent because tag values key the
// evaluation-result cache. Floats compare and hash by bit pattern; ordered
// comparisons go through `partial_cmp_value` instead.
impl PartialEq for TagValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TagValue::Int(a), TagValue::Int(b)) => a == b,
            (TagValue::Long(a), TagValue::Long(b)) => a == b,
            (TagValue::Float(a), TagValue::Float(b)) => a.to_bits() == b.to_bits(),
            (TagValue::Decimal(a), TagValue::Decimal(b)) => a == b,
            (TagValue::Bool(a), TagValue::Bool(b)) => a == b,
            (TagValue::String(a), TagValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TagValue {}

impl Hash for TagValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            TagValue::Int(v) => v.hash(state),
            TagValue::Long(v) => v.hash(state),
            TagValue::Float(v) => v.to_bits().hash(state),
            TagValue::Decimal(v) => v.hash(state),
            TagValue::Bool(v) => v.hash(state),
            TagValue::String(v) => v.hash(state),
        }
    }
}

impl From<i32> for TagValue {
    fn from(v: i32) -> Self {
        TagValue::Int(v)
    }
}

impl From<i64> for TagValue {
    fn from(v: i64) -> Self {
        TagValue::Long(v)
    }
}

impl From<f32> for TagValue {
    fn from(v: f32) -> Self {
        TagValue::Float(v)
    }
}

impl From<Decimal> for TagValue {
    fn from(v: Decimal) -> Self {
        TagValue::Decimal(v)
    }
}

impl From<bool> for TagValue {
    fn from(v: bool) -> Self {
        TagValue::Bool(v)
    }
}

impl From<&str> for TagValue {
    fn from(v: &str) -> Self {
        TagValue::String(v.to_owned())
    }
}

impl From<String> for TagValue {
    fn from(v: String) -> Self {
        TagValue::String(v)
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Int(v) => write!(f, "{v}"),
            TagValue::Long(v) => write!(f, "{v}"),
            TagValue::Float(v) => write!(f, "{v}"),
            TagValue::Decimal(v) => write!(f, "{v}"),
            TagValue::Bool(v) => write!(f, "{v}"),
            TagValue::String(v) => write!(f, "'{v}'"),
        }
    }
}
