//! Runtime values extracted from data sources.

use std::fmt;
use std::sync::Arc;

/// Field access on a nested value.
///
/// Bindings that name a submember probe the value a member returned for a
/// further named field. Any type that wants to sit in that intermediate
/// position implements this trait.
pub trait Fields: Send + Sync {
    /// Look up a named field on this value. `None` when no such field
    /// exists — never an error.
    fn field(&self, name: &str) -> Option<Value>;

    /// Textual rendering used when the value itself lands in output (a
    /// simple placeholder bound directly to an object-valued member).
    fn as_text(&self) -> String;
}

/// A value pulled out of a data source.
///
/// Absence is modeled as `Option<Value>::None` by the accessor layer, not
/// as a variant here: a `Value` always holds something. Scalars render via
/// `Display`; `Object` wraps a shared [`Fields`] implementor so submember
/// chains can probe it.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Object(Arc<dyn Fields>),
}

impl Value {
    /// Convenience constructor for string values.
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Wrap a [`Fields`] implementor.
    pub fn object(fields: impl Fields + 'static) -> Self {
        Value::Object(Arc::new(fields))
    }

    /// Probe this value for a named field.
    ///
    /// Only `Object` values have fields; every scalar yields `None`. This
    /// is the second hop of the two-level null-safe submember chain.
    pub fn field(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(fields) => fields.field(name),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Object(o) => f.write_str(&o.as_text()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Object(o) => write!(f, "Object({})", o.as_text()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            // Objects compare by identity; structural equality is not a
            // concern of the template engine.
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}
