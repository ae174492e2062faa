//! Textual encoding between [`Value`]s and stored column text.
//!
//! Every column is stored as text the store quotes verbatim, so the codec is
//! the single place the storage format is defined:
//!
//! - scalars format directly (`42`, `0.5`, `true`);
//! - timestamps use `YYYY-MM-DD HH:MM:SS`;
//! - bytes become lowercase hex;
//! - maps become `k1$v1,k2$v2` in insertion order;
//! - lists append `$$` after every element (`1$$2$$3$$`);
//! - relation columns hold a `Table$$key` reference token, never data.
//!
//! Booleans are deliberately asymmetric: they encode as the literal words
//! `true`/`false`, but decode compares case-insensitively against `"false"`
//! only — any other text, empty included, decodes to `true`. Empty text
//! decodes to [`Value::Null`] for the remaining scalar kinds, to an empty
//! string for text fields, and to an empty map for maps; an empty list is
//! stored as empty text and comes back absent, not empty.

use chrono::NaiveDateTime;
use record_store_core::{ElemKind, FieldKind, Value};

use crate::error::DecodeError;

/// Timestamp storage format for [`Value::Date`] columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Encodes a field value into its stored text form.
///
/// Relation kinds ignore the value entirely and encode the reference token
/// from the descriptor; the resolver re-reads it at load time. A value whose
/// shape does not match the declared kind encodes to empty text, the same as
/// [`Value::Null`].
pub fn encode(kind: &FieldKind, value: &Value) -> String {
    match kind {
        FieldKind::OneToOne(rel) | FieldKind::OneToMany(rel) => {
            format!("{}$${}", rel.table, rel.key)
        }
        FieldKind::Map => match value {
            Value::Map(pairs) => pairs
                .iter()
                .map(|(k, v)| format!("{k}${v}"))
                .collect::<Vec<_>>()
                .join(","),
            _ => String::new(),
        },
        FieldKind::List(_) => match value {
            Value::List(items) => {
                let mut out = String::new();
                for item in items {
                    out.push_str(&encode_scalar(item));
                    out.push_str("$$");
                }
                out
            }
            _ => String::new(),
        },
        _ => encode_scalar(value),
    }
}

/// Decodes stored column text back into a field value.
///
/// Empty text means the column was never written (or held an empty
/// collection) and decodes to [`Value::Null`], except for text fields
/// (empty string) and maps (empty map). Relation columns are consumed by
/// the resolver, never decoded here.
///
/// # Errors
///
/// Returns a [`DecodeError`] when the text does not parse as the declared
/// kind. Callers reading batches treat this as a per-row event and skip the
/// row rather than failing the read.
pub fn decode(kind: &FieldKind, text: &str) -> Result<Value, DecodeError> {
    match kind {
        FieldKind::OneToOne(_) | FieldKind::OneToMany(_) => Err(DecodeError::RelationColumn),
        FieldKind::Text => Ok(Value::Text(text.to_string())),
        FieldKind::Map => decode_map(text),
        FieldKind::List(elem) => decode_list(*elem, text),
        // Booleans stay tolerant even for empty text: anything that is not
        // literally "false" is true.
        FieldKind::Bool => Ok(Value::Bool(!text.eq_ignore_ascii_case("false"))),
        _ if text.is_empty() => Ok(Value::Null),
        FieldKind::Int | FieldKind::Long => text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| DecodeError::Int(text.to_string())),
        FieldKind::Float | FieldKind::Double => text
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| DecodeError::Float(text.to_string())),
        FieldKind::Bytes => decode_hex(text).map(Value::Bytes),
        FieldKind::Date => NaiveDateTime::parse_from_str(text, DATE_FORMAT)
            .map(Value::Date)
            .map_err(|_| DecodeError::Date(text.to_string())),
    }
}

fn encode_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Value::Text(s) => s.clone(),
        Value::Bytes(b) => encode_hex(b),
        Value::Date(d) => d.format(DATE_FORMAT).to_string(),
        // Collections never reach scalar encoding through a well-formed
        // descriptor; treat them as absent rather than guessing a format.
        Value::Map(_) | Value::List(_) => String::new(),
    }
}

fn decode_map(text: &str) -> Result<Value, DecodeError> {
    if text.is_empty() {
        return Ok(Value::Map(Vec::new()));
    }
    let mut pairs = Vec::new();
    for entry in text.split(',') {
        // First '$' splits key from value; values may contain '$'.
        let (key, value) = entry
            .split_once('$')
            .ok_or_else(|| DecodeError::MapEntry(entry.to_string()))?;
        pairs.push((key.to_string(), value.to_string()));
    }
    Ok(Value::Map(pairs))
}

fn decode_list(elem: ElemKind, text: &str) -> Result<Value, DecodeError> {
    if text.is_empty() {
        // Empty list encodes to empty text and comes back absent.
        return Ok(Value::Null);
    }
    let body = text.strip_suffix("$$").unwrap_or(text);
    let mut items = Vec::new();
    for token in body.split("$$") {
        let value = match elem {
            ElemKind::Text => Value::Text(token.to_string()),
            ElemKind::Int => token
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| DecodeError::Int(token.to_string()))?,
            ElemKind::Float | ElemKind::Double => token
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| DecodeError::Float(token.to_string()))?,
        };
        items.push(value);
    }
    Ok(Value::List(items))
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

fn decode_hex(text: &str) -> Result<Vec<u8>, DecodeError> {
    if text.len() % 2 != 0 {
        return Err(DecodeError::Bytes(text.to_string()));
    }
    let mut out = Vec::with_capacity(text.len() / 2);
    for i in (0..text.len()).step_by(2) {
        let pair = text
            .get(i..i + 2)
            .ok_or_else(|| DecodeError::Bytes(text.to_string()))?;
        let byte = u8::from_str_radix(pair, 16)
            .map_err(|_| DecodeError::Bytes(text.to_string()))?;
        out.push(byte);
    }
    Ok(out)
}
