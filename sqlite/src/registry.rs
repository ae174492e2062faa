//! The type registry: table name to descriptor and erased operations.
//!
//! Record types announce themselves once at startup via
//! [`Engine::register`](crate::Engine::register). Registration derives the
//! type's [`EntityDescriptor`] and stores it alongside two monomorphized
//! function pointers — an erased relation loader and an erased per-table
//! migration — so the rest of the engine can operate on any registered table
//! knowing only its name. Looking up an unregistered table is a
//! configuration error, never a silent miss.
//!
//! Registration order is preserved; [`ensure_schema`](crate::Engine::ensure_schema)
//! walks tables in that order so parents can be created before children
//! deterministically.

use std::any::Any;

use record_store_core::{EntityDescriptor, Persistable};
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::{engine, migration, sql};

/// An open connection plus the registry, threaded through every operation.
///
/// Built inside the store lock, so everything reached through a session —
/// including nested relation loads — runs on the one held handle.
pub(crate) struct Session<'a> {
    pub conn: &'a Connection,
    pub registry: &'a Registry,
}

type ErasedLoad = fn(&Session<'_>, &str) -> Result<Vec<Box<dyn Any>>>;
type ErasedMigrate = fn(&Session<'_>) -> Result<()>;

/// A registered table: its descriptor and the erased operations bound to the
/// concrete record type.
pub(crate) struct TableOps {
    pub descriptor: EntityDescriptor,
    /// Loads all rows matching a rendered predicate, boxed for the resolver.
    pub load_where: ErasedLoad,
    /// Creates or rebuilds the table to match the descriptor.
    pub migrate: ErasedMigrate,
}

/// Ordered set of registered tables.
pub(crate) struct Registry {
    tables: Vec<TableOps>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry { tables: Vec::new() }
    }

    /// Registers `T`, deriving and caching its descriptor.
    ///
    /// Registering the same type again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the [`DescriptorError`](record_store_core::DescriptorError)
    /// from derivation when `T`'s declarations are malformed.
    pub fn register<T: Persistable>(&mut self) -> Result<()> {
        if self.tables.iter().any(|t| t.descriptor.table() == T::table()) {
            return Ok(());
        }
        let descriptor = EntityDescriptor::derive(T::table(), T::fields())?;
        self.tables.push(TableOps {
            descriptor,
            load_where: erased_load_where::<T>,
            migrate: erased_migrate::<T>,
        });
        Ok(())
    }

    /// Looks up a table's registered operations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unregistered`] when no type maps to `table`.
    pub fn get(&self, table: &str) -> Result<&TableOps> {
        self.tables
            .iter()
            .find(|t| t.descriptor.table() == table)
            .ok_or_else(|| StoreError::Unregistered(table.to_string()))
    }

    /// Registered tables, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TableOps> {
        self.tables.iter()
    }
}

fn erased_load_where<T: Persistable>(
    session: &Session<'_>,
    predicate: &str,
) -> Result<Vec<Box<dyn Any>>> {
    let text = sql::select_where(T::table(), predicate);
    let rows = engine::load_rows::<T>(session, &text, true)?;
    Ok(rows
        .into_iter()
        .map(|r| Box::new(r) as Box<dyn Any>)
        .collect())
}

fn erased_migrate<T: Persistable>(session: &Session<'_>) -> Result<()> {
    migration::ensure_table::<T>(session)
}
