//! Runtime values exchanged between record types and the storage engine.
//!
//! [`Value`] is the closed set of things a record can hand to
//! [`field_value`](crate::Persistable::field_value) or receive through
//! [`put_field`](crate::Persistable::put_field). The `From` impls keep
//! `field_value` bodies short:
//!
//! ```
//! use record_store_core::Value;
//!
//! let state: i64 = 4;
//! let v: Value = state.into();
//! assert_eq!(v, Value::Int(4));
//!
//! let missing: Option<String> = None;
//! assert_eq!(Value::from(missing), Value::Null);
//! ```

use chrono::NaiveDateTime;

/// A runtime field value.
///
/// Integers of every declared width travel as [`Value::Int`] and floats as
/// [`Value::Float`]; the declared kind, not the value, decides the stored
/// column type. [`Value::Map`] keeps pairs in insertion order so the encoded
/// form is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value; encodes to empty text.
    Null,
    /// Integer of any declared width.
    Int(i64),
    /// Float of either declared precision.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Timestamp without timezone.
    Date(NaiveDateTime),
    /// Ordered string-to-string pairs.
    Map(Vec<(String, String)>),
    /// Ordered list of scalar values.
    List(Vec<Value>),
}

impl Value {
    /// Creates a text value; accepts `&str` and `String` alike.
    pub fn text(s: impl Into<String>) -> Value {
        Value::Text(s.into())
    }

    /// Creates a map value from any iterator of string pairs, preserving
    /// iteration order.
    pub fn map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Value
    where
        K: Into<String>,
        V: Into<String>,
    {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Creates a list value from any iterator of convertible scalars.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Value {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Value {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Value {
        Value::Bytes(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Value {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Value {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}
