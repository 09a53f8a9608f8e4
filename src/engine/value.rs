//! Tagged values crossing the host/engine boundary.

use std::fmt;

/// A value passed to or returned from an API module call.
///
/// The tag set is closed: every variant has an exact representation on both
/// sides of the boundary, and the marshaling code in each engine backend
/// handles all of them exhaustively. Engine values outside this set do not
/// convert; a call producing one fails as a whole.
#[derive(Debug, Clone, PartialEq)]
pub enum CallValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    /// Ordered sequence of nested values (an array-style table on the engine
    /// side).
    Seq(Vec<CallValue>),
}

impl CallValue {
    /// Tag name used in diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            CallValue::Int(_) => "int",
            CallValue::Float(_) => "float",
            CallValue::Str(_) => "str",
            CallValue::Bool(_) => "bool",
            CallValue::Seq(_) => "seq",
        }
    }
}

impl fmt::Display for CallValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallValue::Int(i) => write!(f, "{i}"),
            CallValue::Float(n) => write!(f, "{n}"),
            CallValue::Str(s) => f.write_str(s),
            CallValue::Bool(b) => write!(f, "{b}"),
            CallValue::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<i64> for CallValue {
    fn from(value: i64) -> Self {
        CallValue::Int(value)
    }
}

impl From<f64> for CallValue {
    fn from(value: f64) -> Self {
        CallValue::Float(value)
    }
}

impl From<bool> for CallValue {
    fn from(value: bool) -> Self {
        CallValue::Bool(value)
    }
}

impl From<&str> for CallValue {
    fn from(value: &str) -> Self {
        CallValue::Str(value.to_string())
    }
}

impl From<String> for CallValue {
    fn from(value: String) -> Self {
        CallValue::Str(value)
    }
}

impl From<Vec<CallValue>> for CallValue {
    fn from(value: Vec<CallValue>) -> Self {
        CallValue::Seq(value)
    }
}
