//! SQLite storage engine for declared record types.
//!
//! Record types describe their persisted shape as data (see
//! `record-store-core`); this crate turns those declarations into tables,
//! column-count migrations, generated CRUD statements, and relation loading
//! with no per-type mapping code.
//!
//! # Architecture
//!
//! - **`codec`** — text encoding between runtime values and stored columns
//! - **`sql`** — statement text generation from descriptors
//! - **`migration`** — create-or-rebuild table lifecycle
//! - **`engine`** — the public [`Engine`] facade and row loading
//!
//! plus internal modules for the store accessor, the type registry, and the
//! relation resolver. Everything funnels through one process-wide lock
//! inside [`Store`], so the engine is safe to share across threads while
//! behaving as a single writer.
//!
//! # Quick start
//!
//! ```no_run
//! use record_store_sqlite::{Engine, Store};
//! # use record_store_core::{FieldSpec, Persistable, RowId, Value};
//! # #[derive(Debug, Default)]
//! # struct DownloadTask { row_id: Option<RowId>, url: String }
//! # static FIELDS: &[FieldSpec] = &[FieldSpec::text("url").primary()];
//! # impl Persistable for DownloadTask {
//! #     fn table() -> &'static str { "DownloadTask" }
//! #     fn fields() -> &'static [FieldSpec] { FIELDS }
//! #     fn field_value(&self, f: &str) -> Value {
//! #         if f == "url" { Value::text(&self.url) } else { Value::Null }
//! #     }
//! #     fn put_field(&mut self, f: &str, v: Value) {
//! #         if let ("url", Value::Text(s)) = (f, v) { self.url = s; }
//! #     }
//! #     fn row_id(&self) -> Option<RowId> { self.row_id }
//! #     fn set_row_id(&mut self, id: RowId) { self.row_id = Some(id); }
//! # }
//!
//! let mut engine = Engine::new(Store::open("tasks.db"));
//! engine.register::<DownloadTask>().unwrap();
//! engine.ensure_schema().unwrap();
//!
//! let mut task = DownloadTask { row_id: None, url: "https://example.org/a".into() };
//! engine.insert(&mut task).unwrap();
//!
//! let all: Vec<DownloadTask> = engine.find_all_unfiltered().unwrap();
//! assert!(!all.is_empty());
//! ```

pub mod codec;
mod engine;
mod error;
pub mod migration;
mod registry;
mod resolver;
pub mod sql;
mod store;

pub use engine::Engine;
pub use error::{DecodeError, Result, StoreError};
pub use migration::{stored_column_count, table_exists};
pub use store::Store;
