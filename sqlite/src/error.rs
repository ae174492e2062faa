//! Error types for the SQLite storage engine.
//!
//! [`StoreError`] covers everything an engine operation can surface:
//! database access, bad type declarations, configuration mistakes, and
//! migration failures. [`DecodeError`] is kept separate because a decode
//! failure is a per-row event — batch reads log it and skip the row instead
//! of failing the operation.

use record_store_core::DescriptorError;
use thiserror::Error;

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite operation failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A type declaration the engine cannot store (surfaced at
    /// registration).
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// A stored column could not be decoded into its declared field.
    ///
    /// Batch reads intercept this per row; it only surfaces from paths that
    /// decode a single known row.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// An operation named a table no registered type maps to.
    #[error("no type registered for table '{0}'")]
    Unregistered(String),

    /// An update was attempted on a record that has never been inserted or
    /// loaded, so it carries no row identifier.
    #[error("record has no row identifier; insert it or load it first")]
    MissingRowId,

    /// A predicate template has more `?` placeholders than arguments.
    #[error("predicate '{expr}' has {placeholders} placeholders but {args} arguments")]
    PredicateArity {
        /// The predicate template as passed in.
        expr: String,
        /// Number of `?` placeholders found.
        placeholders: usize,
        /// Number of arguments supplied.
        args: usize,
    },

    /// A table rebuild failed partway; the table may be left under its
    /// temporary name.
    #[error("migration of table '{table}' failed: {reason}")]
    Migration {
        /// Table whose rebuild failed.
        table: String,
        /// Underlying failure.
        reason: String,
    },
}

/// A stored text value that does not parse as its declared field kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Text that should hold an integer.
    #[error("cannot parse '{0}' as an integer")]
    Int(String),

    /// Text that should hold a float.
    #[error("cannot parse '{0}' as a float")]
    Float(String),

    /// Text that should hold a `YYYY-MM-DD HH:MM:SS` timestamp.
    #[error("cannot parse '{0}' as a timestamp")]
    Date(String),

    /// Text that should hold hex-encoded bytes.
    #[error("cannot parse '{0}' as hex bytes")]
    Bytes(String),

    /// A map entry with no key/value separator.
    #[error("map entry '{0}' has no '$' separator")]
    MapEntry(String),

    /// A relation reference token with no table/key separator.
    #[error("relation token '{0}' has no '$$' separator")]
    Token(String),

    /// A relation column was asked to decode as a value; relation fields are
    /// filled by the resolver, never by the codec.
    #[error("relation columns hold reference tokens, not values")]
    RelationColumn,
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
