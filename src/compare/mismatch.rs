use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Expected,
    Actual,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected => f.write_str("expected"),
            Self::Actual => f.write_str("actual"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchReason {
    MissingKey,
    KindMismatch { expected: JsonKind, actual: JsonKind },
    ValueMismatch,
    LengthMismatch { expected: usize, actual: usize },
    NullNotAllowed,
    Unsupported { kind: JsonKind },
    Malformed { side: Side },
    NotAnObject { side: Side, kind: JsonKind },
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey => f.write_str("key is missing"),
            Self::KindMismatch { expected, actual } => {
                write!(f, "expected {}, got {}", expected, actual)
            }
            Self::ValueMismatch => f.write_str("values differ"),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected {} items, got {}", expected, actual)
            }
            Self::NullNotAllowed => f.write_str("null is not allowed"),
            Self::Unsupported { kind } => write!(f, "{} values are not comparable", kind),
            Self::Malformed { side } => write!(f, "{} body is not valid JSON", side),
            Self::NotAnObject { side, kind } => {
                write!(f, "{} body is a JSON {}, not an object", side, kind)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// First disagreement between two bodies, located by its JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    path: Vec<PathSegment>,
    reason: MismatchReason,
}

impl Mismatch {
    pub(super) const fn new(reason: MismatchReason) -> Self {
        Self {
            path: Vec::new(),
            reason,
        }
    }

    /// Segments are pushed innermost first while unwinding.
    pub(super) fn within(mut self, segment: PathSegment) -> Self {
        self.path.push(segment);
        self
    }

    pub(super) fn finish(mut self) -> Self {
        self.path.reverse();
        self
    }

    #[must_use]
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    #[must_use]
    pub const fn reason(&self) -> &MismatchReason {
        &self.reason
    }

    /// Renders the path as `$.key[0].inner`.
    #[must_use]
    pub fn path_string(&self) -> String {
        let mut rendered = String::from("$");
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) => {
                    rendered.push('.');
                    rendered.push_str(key);
                }
                PathSegment::Index(index) => {
                    rendered.push('[');
                    rendered.push_str(&index.to_string());
                    rendered.push(']');
                }
            }
        }
        rendered
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path_string(), self.reason)
    }
}
