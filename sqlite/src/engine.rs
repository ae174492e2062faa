//! The public engine facade and the shared row loader.
//!
//! [`Engine`] owns the [`Store`] and the type registry and exposes the whole
//! CRUD surface: register, ensure-schema, insert, update, find, delete.
//! Every operation acquires the store lock for its full duration — nested
//! relation loads run on the already-held handle — so all access is
//! serialized.
//!
//! Propagation policy: write paths (insert, update, delete, ensure-schema)
//! surface database errors to the caller; read paths log them and return an
//! empty result, so a failed read is indistinguishable from "no matching
//! rows" (inherited behavior, kept deliberately). Configuration errors —
//! unregistered tables, bad predicates — propagate from every path.

use record_store_core::{EntityDescriptor, FieldKind, Persistable, RowId, Value};
use tracing::{debug, error, warn};

use crate::error::{Result, StoreError};
use crate::registry::{Registry, Session};
use crate::store::Store;
use crate::{codec, resolver, sql};

/// The persistence engine: a store plus its registered record types.
///
/// Construct one at startup, register every record type, call
/// [`ensure_schema`](Engine::ensure_schema) once, then share it by
/// reference; all methods take `&self` and the engine is `Send + Sync`.
///
/// # Examples
///
/// ```
/// use record_store_core::{FieldSpec, Persistable, RowId, Value};
/// use record_store_sqlite::{Engine, Store};
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct Bookmark {
///     row_id: Option<RowId>,
///     url: String,
/// }
///
/// static BOOKMARK_FIELDS: &[FieldSpec] = &[FieldSpec::text("url").primary()];
///
/// impl Persistable for Bookmark {
///     fn table() -> &'static str {
///         "Bookmark"
///     }
///     fn fields() -> &'static [FieldSpec] {
///         BOOKMARK_FIELDS
///     }
///     fn field_value(&self, field: &str) -> Value {
///         match field {
///             "url" => Value::text(&self.url),
///             _ => Value::Null,
///         }
///     }
///     fn put_field(&mut self, field: &str, value: Value) {
///         if let ("url", Value::Text(s)) = (field, value) {
///             self.url = s;
///         }
///     }
///     fn row_id(&self) -> Option<RowId> {
///         self.row_id
///     }
///     fn set_row_id(&mut self, id: RowId) {
///         self.row_id = Some(id);
///     }
/// }
///
/// let mut engine = Engine::new(Store::in_memory());
/// engine.register::<Bookmark>().unwrap();
/// engine.ensure_schema().unwrap();
///
/// let mut b = Bookmark { row_id: None, url: "https://example.org".into() };
/// let id = engine.insert(&mut b).unwrap();
///
/// let loaded: Option<Bookmark> =
///     engine.find_one("rowid = ?", &[&id.to_string()]).unwrap();
/// assert_eq!(loaded.unwrap().url, "https://example.org");
/// ```
pub struct Engine {
    store: Store,
    registry: Registry,
}

impl Engine {
    /// Creates an engine over the given store. No connection is opened yet.
    pub fn new(store: Store) -> Engine {
        Engine { store, registry: Registry::new() }
    }

    /// Registers a record type, deriving and caching its descriptor.
    ///
    /// Must precede any operation on `T`. Registering the same type twice is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// Returns the descriptor derivation error when `T`'s field declarations
    /// are malformed. Fatal; fix the declaration.
    pub fn register<T: Persistable>(&mut self) -> Result<()> {
        self.registry.register::<T>()
    }

    /// Creates or migrates every registered table, in registration order.
    ///
    /// Idempotent: a second call over an unchanged registry changes nothing
    /// and returns no error. A table whose stored column count no longer
    /// matches its descriptor is rebuilt, preserving decodable rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Migration`] when a rebuild fails partway; the
    /// old data is left under the table's `_temp` name.
    pub fn ensure_schema(&self) -> Result<()> {
        self.store.with_conn(|conn| {
            let session = Session { conn, registry: &self.registry };
            for ops in self.registry.iter() {
                (ops.migrate)(&session)?;
            }
            Ok(())
        })
    }

    /// Inserts a record, stamping the store-assigned row identifier back
    /// onto it.
    ///
    /// # Errors
    ///
    /// Propagates database errors and [`StoreError::Unregistered`].
    pub fn insert<T: Persistable>(&self, record: &mut T) -> Result<RowId> {
        self.store.with_conn(|conn| {
            let session = Session { conn, registry: &self.registry };
            insert_record(&session, record)
        })
    }

    /// Rewrites every column of a previously inserted or loaded record,
    /// matched by its row identifier and nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingRowId`] when the record was never
    /// inserted or loaded; propagates database errors.
    pub fn update<T: Persistable>(&self, record: &T) -> Result<()> {
        let row_id = record.row_id().ok_or(StoreError::MissingRowId)?;
        self.store.with_conn(|conn| {
            let ops = self.registry.get(T::table())?;
            let values = encode_values(&ops.descriptor, record);
            let text = sql::update(&ops.descriptor, &values, row_id);
            debug!(sql = %text, "Update");
            conn.execute(&text, [])?;
            Ok(())
        })
    }

    /// Loads the first record matching the predicate, relations resolved.
    ///
    /// A database failure logs an error and returns `None`, indistinguishable
    /// from no match.
    pub fn find_one<T: Persistable>(&self, expr: &str, args: &[&str]) -> Result<Option<T>> {
        Ok(self.find_all(expr, args)?.into_iter().next())
    }

    /// Loads every record matching the predicate, relations resolved.
    ///
    /// The predicate is a partial SQL boolean expression; each `?` is
    /// replaced in order by the next argument, single-quoted verbatim.
    /// A database failure logs an error and returns an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PredicateArity`] for a template with more `?`
    /// placeholders than arguments, and configuration errors such as
    /// [`StoreError::Unregistered`].
    pub fn find_all<T: Persistable>(&self, expr: &str, args: &[&str]) -> Result<Vec<T>> {
        let predicate = sql::render_predicate(expr, args)?;
        self.read(sql::select_where(T::table(), &predicate))
    }

    /// Loads every stored record of `T`, relations resolved.
    pub fn find_all_unfiltered<T: Persistable>(&self) -> Result<Vec<T>> {
        self.read(sql::select_all(T::table()))
    }

    /// Deletes exactly the rows matching the predicate.
    ///
    /// # Errors
    ///
    /// Same predicate contract as [`find_all`](Engine::find_all); database
    /// errors propagate (delete is a write path).
    pub fn delete<T: Persistable>(&self, expr: &str, args: &[&str]) -> Result<()> {
        let predicate = sql::render_predicate(expr, args)?;
        self.store.with_conn(|conn| {
            self.registry.get(T::table())?;
            let text = sql::delete(T::table(), &predicate);
            debug!(sql = %text, "Delete");
            conn.execute(&text, [])?;
            Ok(())
        })
    }

    /// Explicit close, kept as a no-op; see [`Store::close`].
    pub fn close(&self) {
        self.store.close();
    }

    fn read<T: Persistable>(&self, text: String) -> Result<Vec<T>> {
        self.store.with_conn(|conn| {
            let session = Session { conn, registry: &self.registry };
            match load_rows::<T>(&session, &text, true) {
                Ok(rows) => Ok(rows),
                Err(StoreError::Database(err)) => {
                    error!(table = T::table(), error = %err, "Read failed, returning no rows");
                    Ok(Vec::new())
                }
                Err(other) => Err(other),
            }
        })
    }
}

/// Encodes a record's live field values in descriptor order.
pub(crate) fn encode_values<T: Persistable>(desc: &EntityDescriptor, record: &T) -> Vec<String> {
    desc.fields()
        .iter()
        .map(|f| codec::encode(&f.kind, &record.field_value(f.name)))
        .collect()
}

/// Inserts one record through the normal insert path and stamps its rowid.
pub(crate) fn insert_record<T: Persistable>(session: &Session<'_>, record: &mut T) -> Result<RowId> {
    let ops = session.registry.get(T::table())?;
    let values = encode_values(&ops.descriptor, record);
    let text = sql::insert(&ops.descriptor, &values);
    debug!(sql = %text, "Insert");
    session.conn.execute(&text, [])?;
    let row_id = session.conn.last_insert_rowid();
    record.set_row_id(row_id);
    Ok(row_id)
}

/// Executes a `SELECT rowid, *` statement and decodes the rows into records.
///
/// Columns are matched to declared fields by name, so the statement may run
/// against an older table shape: missing columns leave fields at their zero
/// value, surplus columns are ignored. A row that fails to decode is logged
/// and skipped. With `resolve` set, relation fields are filled in through
/// the stored reference tokens; migration reads pass `false` since tokens
/// are re-encoded on reinsert anyway.
pub(crate) fn load_rows<T: Persistable>(
    session: &Session<'_>,
    text: &str,
    resolve: bool,
) -> Result<Vec<T>> {
    let ops = session.registry.get(T::table())?;
    let desc = &ops.descriptor;
    debug!(sql = %text, "Select");

    // Phase one: pull every row out as text while the statement is live.
    let mut stmt = session.conn.prepare(text)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let raw: Vec<Vec<String>> = stmt
        .query_map([], |row| {
            let mut cells = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let cell: rusqlite::types::Value = row.get(i)?;
                cells.push(stringify(cell));
            }
            Ok(cells)
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    drop(stmt);

    // Phase two: decode, then resolve relations on the freed connection.
    let mut records = Vec::with_capacity(raw.len());
    'rows: for cells in raw {
        let mut record = T::default();
        if let Some(idx) = column_index(&columns, "rowid") {
            if let Ok(id) = cells[idx].parse::<RowId>() {
                record.set_row_id(id);
            }
        }

        for field in desc.fields() {
            if field.kind.is_relation() {
                continue;
            }
            let Some(idx) = column_index(&columns, field.name) else {
                continue;
            };
            match codec::decode(&field.kind, &cells[idx]) {
                Ok(Value::Null) => {}
                Ok(value) => record.put_field(field.name, value),
                Err(err) => {
                    warn!(
                        table = desc.table(),
                        column = field.name,
                        error = %err,
                        "Skipping undecodable row"
                    );
                    continue 'rows;
                }
            }
        }

        if resolve {
            let primary_text = desc
                .primary()
                .map(|p| codec::encode(&p.kind, &record.field_value(p.name)));

            for field in desc.fields() {
                let one_to_one = match field.kind {
                    FieldKind::OneToOne(_) => true,
                    FieldKind::OneToMany(_) => false,
                    _ => continue,
                };
                let Some(primary) = primary_text.as_deref() else {
                    continue;
                };
                if primary.is_empty() {
                    continue;
                }
                let Some(idx) = column_index(&columns, field.name) else {
                    continue;
                };
                let token = &cells[idx];
                if token.is_empty() {
                    continue;
                }
                match resolver::resolve(session, token, primary) {
                    Ok(mut rows) => {
                        if one_to_one {
                            rows.truncate(1);
                        }
                        if !rows.is_empty() {
                            record.put_related(field.name, rows);
                        }
                    }
                    Err(StoreError::Decode(err)) => {
                        warn!(
                            table = desc.table(),
                            column = field.name,
                            error = %err,
                            "Skipping row with malformed relation token"
                        );
                        continue 'rows;
                    }
                    Err(other) => return Err(other),
                }
            }
        }

        records.push(record);
    }

    Ok(records)
}

fn column_index(columns: &[String], name: &str) -> Option<usize> {
    columns.iter().position(|c| c.eq_ignore_ascii_case(name))
}

fn stringify(value: rusqlite::types::Value) -> String {
    use rusqlite::types::Value as Sql;
    match value {
        Sql::Null => String::new(),
        Sql::Integer(i) => i.to_string(),
        Sql::Real(f) => f.to_string(),
        Sql::Text(s) => s,
        // All writes quote values as text; blobs only appear if some other
        // writer touched the table. Render them as lowercase hex so byte
        // columns still decode.
        Sql::Blob(bytes) => bytes.iter().map(|b| format!("{b:02x}")).collect(),
    }
}
