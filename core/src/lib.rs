//! Core declarations and contracts for record storage.
//!
//! This crate defines what a storable record type looks like, independent of
//! any storage backend:
//!
//! - [`FieldSpec`] — one declared field: name, [`DeclaredKind`], primary /
//!   ignore markers, list element kind, relation target.
//! - [`EntityDescriptor`] — the checked, classified form of a declaration
//!   set; [`derive`](EntityDescriptor::derive) validates and produces it.
//! - [`Value`] — the closed set of runtime values records exchange with the
//!   engine.
//! - [`Persistable`] — the trait a record type implements: static
//!   declarations plus by-name field access.
//!
//! # Example
//!
//! ```
//! use record_store_core::*;
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct DownloadTask {
//!     row_id: Option<RowId>,
//!     url: String,
//!     state: i64,
//!     completed: bool,
//! }
//!
//! static DOWNLOAD_TASK_FIELDS: &[FieldSpec] = &[
//!     FieldSpec::text("url").primary(),
//!     FieldSpec::long("state"),
//!     FieldSpec::bool("completed"),
//! ];
//!
//! impl Persistable for DownloadTask {
//!     fn table() -> &'static str {
//!         "DownloadTask"
//!     }
//!
//!     fn fields() -> &'static [FieldSpec] {
//!         DOWNLOAD_TASK_FIELDS
//!     }
//!
//!     fn field_value(&self, field: &str) -> Value {
//!         match field {
//!             "url" => Value::text(&self.url),
//!             "state" => self.state.into(),
//!             "completed" => self.completed.into(),
//!             _ => Value::Null,
//!         }
//!     }
//!
//!     fn put_field(&mut self, field: &str, value: Value) {
//!         match (field, value) {
//!             ("url", Value::Text(s)) => self.url = s,
//!             ("state", Value::Int(n)) => self.state = n,
//!             ("completed", Value::Bool(b)) => self.completed = b,
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
//! let desc = EntityDescriptor::derive(DownloadTask::table(), DownloadTask::fields()).unwrap();
//! assert_eq!(desc.table(), "DownloadTask");
//! assert_eq!(desc.primary().unwrap().name, "url");
//! assert_eq!(desc.column_count(), 4);
//! ```

mod descriptor;
mod field;
mod persist;
mod value;

pub use descriptor::{
    DescriptorError, EntityDescriptor, FieldDescriptor, FieldKind, ROW_ID_NAME, RelationRef,
};
pub use field::{DeclaredKind, ElemKind, FieldSpec, RelationSpec};
pub use persist::{Persistable, RowId};
pub use value::Value;
