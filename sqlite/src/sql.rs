//! SQL statement text generation from entity descriptors.
//!
//! Every statement the engine executes is built here as plain text from a
//! descriptor and, for writes, the already-encoded column values. The
//! generator reproduces the legacy store's conventions exactly:
//!
//! - reads always project `rowid` ahead of the declared columns;
//! - every written value is single-quoted as text, whatever the column's
//!   declared affinity (numeric columns receive quoted literals too);
//! - predicate arguments are substituted verbatim inside single quotes with
//!   no escaping — callers own their inputs (documented injection risk);
//! - the implicit `rowid` column belongs to the store and is never declared
//!   in `CREATE TABLE`.

use record_store_core::{EntityDescriptor, FieldKind, RowId};

use crate::error::{Result, StoreError};

/// Column type affinity for a classified field kind.
///
/// Everything the codec stores as structured text (maps, lists, relation
/// tokens) gets text affinity; scalar kinds keep their native affinity even
/// though inserts quote every value.
pub fn affinity(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Text | FieldKind::Map | FieldKind::List(_) => "VARCHAR",
        FieldKind::OneToOne(_) | FieldKind::OneToMany(_) => "VARCHAR",
        FieldKind::Int => "INTEGER",
        FieldKind::Long => "BIGINT",
        FieldKind::Float => "FLOAT",
        FieldKind::Double => "DOUBLE",
        FieldKind::Bool => "BOOLEAN",
        FieldKind::Date => "DATE",
        FieldKind::Bytes => "BLOB",
    }
}

/// Builds the `CREATE TABLE` statement for a descriptor.
///
/// The primary field, if any, carries `NOT NULL`; the store's implicit
/// `rowid` is not declared.
pub fn create_table(desc: &EntityDescriptor) -> String {
    let columns: Vec<String> = desc
        .fields()
        .iter()
        .map(|f| {
            let mut col = format!("{} {}", f.name, affinity(&f.kind));
            if f.primary {
                col.push_str(" NOT NULL");
            }
            col
        })
        .collect();
    format!("CREATE TABLE {} ({})", desc.table(), columns.join(", "))
}

/// Builds a filtered read: `SELECT rowid, * FROM <t> WHERE <predicate>`.
pub fn select_where(table: &str, predicate: &str) -> String {
    format!("SELECT rowid, * FROM {table} WHERE {predicate}")
}

/// Builds an unfiltered scan: `SELECT rowid, * FROM <t>`.
pub fn select_all(table: &str) -> String {
    format!("SELECT rowid, * FROM {table}")
}

/// Builds an `INSERT` from encoded values aligned with the descriptor's
/// field order. Every value is quoted as text.
pub fn insert(desc: &EntityDescriptor, values: &[String]) -> String {
    let columns: Vec<&str> = desc.fields().iter().map(|f| f.name).collect();
    let quoted: Vec<String> = values.iter().map(|v| format!("'{v}'")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        desc.table(),
        columns.join(", "),
        quoted.join(", ")
    )
}

/// Builds an `UPDATE` setting every declared column, matched by `rowid`
/// equality and nothing else.
pub fn update(desc: &EntityDescriptor, values: &[String], row_id: RowId) -> String {
    let assignments: Vec<String> = desc
        .fields()
        .iter()
        .zip(values)
        .map(|(f, v)| format!("{}='{}'", f.name, v))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE rowid={row_id}",
        desc.table(),
        assignments.join(", ")
    )
}

/// Builds a `DELETE FROM <t> WHERE <predicate>`.
pub fn delete(table: &str, predicate: &str) -> String {
    format!("DELETE FROM {table} WHERE {predicate}")
}

/// Renames a table to its migration scratch name.
pub fn rename_to_temp(table: &str) -> String {
    format!("ALTER TABLE {table} RENAME TO {table}_temp")
}

/// Drops a table's migration scratch name if it exists.
pub fn drop_temp(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {table}_temp")
}

/// Substitutes positional `?` placeholders in a predicate template.
///
/// Each placeholder is replaced in order by the next argument, single-quoted
/// verbatim. Surplus arguments are silently unused; a template with more
/// placeholders than arguments is a configuration error.
///
/// # Errors
///
/// Returns [`StoreError::PredicateArity`] when the template has more `?`
/// placeholders than supplied arguments.
pub fn render_predicate(expr: &str, args: &[&str]) -> Result<String> {
    let placeholders = expr.matches('?').count();
    if placeholders > args.len() {
        return Err(StoreError::PredicateArity {
            expr: expr.to_string(),
            placeholders,
            args: args.len(),
        });
    }

    // split yields one more part than placeholders; the final part gets no
    // argument.
    let parts: Vec<&str> = expr.split('?').collect();
    let mut out = String::with_capacity(expr.len());
    for (i, part) in parts.iter().enumerate() {
        out.push_str(part);
        if i < placeholders {
            out.push('\'');
            out.push_str(args[i]);
            out.push('\'');
        }
    }
    Ok(out)
}
