//! The [`Persistable`] contract between record types and the storage engine.
//!
//! A persistable type declares its table and fields statically and moves
//! values in and out by field name. The engine never inspects the type
//! itself; everything it knows comes from [`fields`](Persistable::fields)
//! and the two accessors. Implementations are plain `match` blocks:
//!
//! ```
//! use record_store_core::{FieldSpec, Persistable, RowId, Value};
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct Bookmark {
//!     row_id: Option<RowId>,
//!     url: String,
//!     clicks: i64,
//! }
//!
//! static BOOKMARK_FIELDS: &[FieldSpec] =
//!     &[FieldSpec::text("url").primary(), FieldSpec::long("clicks")];
//!
//! impl Persistable for Bookmark {
//!     fn table() -> &'static str {
//!         "Bookmark"
//!     }
//!
//!     fn fields() -> &'static [FieldSpec] {
//!         BOOKMARK_FIELDS
//!     }
//!
//!     fn field_value(&self, field: &str) -> Value {
//!         match field {
//!             "url" => Value::text(&self.url),
//!             "clicks" => self.clicks.into(),
//!             _ => Value::Null,
//!         }
//!     }
//!
//!     fn put_field(&mut self, field: &str, value: Value) {
//!         match (field, value) {
//!             ("url", Value::Text(s)) => self.url = s,
//!             ("clicks", Value::Int(n)) => self.clicks = n,
//!             _ => {}
//!         }
//!     }
//!
//!     fn row_id(&self) -> Option<RowId> {
//!         self.row_id
//!     }
//!
//!     fn set_row_id(&mut self, id: RowId) {
//!         self.row_id = Some(id);
//!     }
//! }
//!
//! let b = Bookmark { url: "https://example.org".into(), clicks: 3, row_id: None };
//! assert_eq!(b.field_value("clicks"), Value::Int(3));
//! ```

use std::any::Any;

use crate::field::FieldSpec;
use crate::value::Value;

/// Store-managed row identifier.
///
/// Assigned by the store on insert, reported back through
/// [`set_row_id`](Persistable::set_row_id), and required for updates. Values
/// are not stable across schema migrations: a rebuilt table hands out fresh
/// identifiers.
pub type RowId = i64;

/// A type whose values can be stored as table rows.
///
/// `Default` provides the zero-valued record that reads populate field by
/// field; fields whose columns are absent or undecodable keep their default.
/// `'static` lets resolved relation rows cross the engine's type-erasure
/// boundary.
///
/// # Contract
///
/// - [`fields`](Persistable::fields) order fixes column order in every
///   generated statement.
/// - [`field_value`](Persistable::field_value) returns [`Value::Null`] for
///   unknown names; [`put_field`](Persistable::put_field) ignores unknown
///   names and value shapes it does not expect. Neither panics.
/// - [`put_related`](Persistable::put_related) receives resolved relation
///   rows as `Box<dyn Any>` of the related concrete type; implementations
///   downcast and keep what matches. Types without relation fields keep the
///   default no-op.
pub trait Persistable: Default + 'static {
    /// Table this type maps to.
    fn table() -> &'static str;

    /// Declared fields, in storage order.
    fn fields() -> &'static [FieldSpec];

    /// Current value of the named field.
    fn field_value(&self, field: &str) -> Value;

    /// Stores a decoded value into the named field.
    fn put_field(&mut self, field: &str, value: Value);

    /// Stores resolved relation rows into the named relation field.
    ///
    /// One-to-one fields receive at most one row; one-to-many fields receive
    /// every match. An empty `rows` means nothing matched and the field
    /// keeps its zero value.
    fn put_related(&mut self, field: &str, rows: Vec<Box<dyn Any>>) {
        let _ = (field, rows);
    }

    /// Row identifier assigned by the store, if this record has been
    /// inserted or loaded.
    fn row_id(&self) -> Option<RowId>;

    /// Records the store-assigned row identifier.
    fn set_row_id(&mut self, id: RowId);
}
