//! Schema creation and column-count migration.
//!
//! Each registered table is checked at [`ensure_schema`](crate::Engine::ensure_schema)
//! time: an absent table is created from its descriptor; a present table
//! whose stored column count matches `declared fields + 1` (the implicit
//! rowid) is left alone; anything else triggers a rebuild, the legacy
//! backup sequence kept intact:
//!
//! 1. read every existing row into records under the current declarations
//!    (columns matched by name; missing columns keep zero values;
//!    undecodable rows are skipped),
//! 2. `ALTER TABLE <t> RENAME TO <t>_temp`,
//! 3. create the new shape,
//! 4. reinsert every record through the normal insert path (fresh rowids),
//! 5. `DROP TABLE IF EXISTS <t>_temp`.
//!
//! The column count is a coarse signature: it detects added or removed
//! columns, never a same-count rename or type change (known limitation,
//! kept). The sequence is deliberately not one transaction — a failure
//! surfaces as [`StoreError::Migration`] and leaves the store exactly at
//! the failure point, old data still under the `_temp` name, rather than
//! pretending to roll back.

use record_store_core::Persistable;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::registry::Session;
use crate::{engine, sql};

/// Whether a table of this name exists in the store.
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        rusqlite::params![table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Number of columns a `SELECT rowid, *` against the table reports,
/// implicit rowid included.
///
/// This is the stored side of the migration trigger; the declared side is
/// [`EntityDescriptor::column_count`](record_store_core::EntityDescriptor::column_count).
///
/// # Errors
///
/// Fails when the table does not exist; check [`table_exists`] first.
pub fn stored_column_count(conn: &Connection, table: &str) -> Result<usize> {
    let stmt = conn.prepare(&sql::select_all(table))?;
    Ok(stmt.column_count())
}

/// Creates or migrates `T`'s table to match its registered descriptor.
pub(crate) fn ensure_table<T: Persistable>(session: &Session<'_>) -> Result<()> {
    let ops = session.registry.get(T::table())?;
    let desc = &ops.descriptor;
    let table = desc.table();

    if !table_exists(session.conn, table)? {
        let text = sql::create_table(desc);
        debug!(sql = %text, "Creating table");
        session.conn.execute(&text, [])?;
        return Ok(());
    }

    let stored = stored_column_count(session.conn, table)?;
    if stored == desc.column_count() {
        debug!(table, columns = stored, "Table shape is current");
        return Ok(());
    }

    info!(
        table,
        stored,
        declared = desc.column_count(),
        "Column count changed, rebuilding table"
    );
    rebuild::<T>(session).map_err(|err| StoreError::Migration {
        table: table.to_string(),
        reason: err.to_string(),
    })
}

fn rebuild<T: Persistable>(session: &Session<'_>) -> Result<()> {
    let ops = session.registry.get(T::table())?;
    let desc = &ops.descriptor;
    let table = desc.table();

    // Decode against the old shape first; relations are not resolved here,
    // their tokens are re-encoded from the declarations on reinsert.
    let mut records: Vec<T> = engine::load_rows(session, &sql::select_all(table), false)?;
    info!(table, rows = records.len(), "Carrying rows across rebuild");

    session.conn.execute(&sql::rename_to_temp(table), [])?;
    session.conn.execute(&sql::create_table(desc), [])?;
    for record in &mut records {
        engine::insert_record(session, record)?;
    }
    session.conn.execute(&sql::drop_temp(table), [])?;
    Ok(())
}
