use serde::{Deserialize, Serialize};

/// One declared attribute of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name as it appears in caller objects and store columns.
    pub name: String,
    pub kind: AttributeKind,
}

impl Attribute {
    fn simple(name: &str, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Shorthand for a text attribute.
    pub fn text(name: &str) -> Self {
        Self::simple(name, AttributeKind::Text)
    }

    /// Shorthand for an integer attribute.
    pub fn integer(name: &str) -> Self {
        Self::simple(name, AttributeKind::Integer)
    }

    /// Shorthand for a floating-point attribute.
    pub fn float(name: &str) -> Self {
        Self::simple(name, AttributeKind::Float)
    }

    /// Shorthand for a boolean attribute.
    pub fn boolean(name: &str) -> Self {
        Self::simple(name, AttributeKind::Boolean)
    }

    /// Shorthand for a date-time attribute.
    pub fn datetime(name: &str) -> Self {
        Self::simple(name, AttributeKind::DateTime)
    }

    /// Shorthand for a JSON blob attribute.
    pub fn json(name: &str) -> Self {
        Self::simple(name, AttributeKind::Json)
    }
}

/// The data type of a declared attribute.
///
/// Kinds describe intent for store backends; the filtering path never
/// inspects them, so values of any JSON shape pass through unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Text,
    Integer,
    Float,
    Boolean,
    DateTime,
    Json,
}
