//! The store accessor: one lazily-opened connection behind one lock.
//!
//! [`Store`] owns the database location and a single [`Connection`] that
//! opens on first use and stays open for the store's lifetime. Every engine
//! operation runs inside [`with_conn`](Store::with_conn) and therefore under
//! the one process-wide mutex, so all schema and data access is serialized:
//! the engine behaves as if single-threaded with respect to the store even
//! when callers are not. [`close`](Store::close) is an explicit no-op kept
//! for call-site compatibility with the legacy lifecycle; dropping the
//! `Store` releases the connection.

use std::path::PathBuf;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;

enum Location {
    /// Database file on disk, created on first open.
    Path(PathBuf),
    /// Private in-memory database, for tests and throwaway stores.
    Memory,
}

/// Owner of the single store connection.
///
/// # Examples
///
/// ```
/// use record_store_sqlite::Store;
///
/// let store = Store::in_memory();
/// let count: i64 = store
///     .with_conn(|conn| {
///         Ok(conn.query_row("SELECT 1", [], |row| row.get(0))?)
///     })
///     .unwrap();
/// assert_eq!(count, 1);
/// ```
pub struct Store {
    location: Location,
    conn: Mutex<Option<Connection>>,
}

impl Store {
    /// Creates a store backed by a database file.
    ///
    /// Nothing is opened until the first [`with_conn`](Store::with_conn)
    /// call; a missing file is created then.
    pub fn open(path: impl Into<PathBuf>) -> Store {
        Store {
            location: Location::Path(path.into()),
            conn: Mutex::new(None),
        }
    }

    /// Creates a store backed by a private in-memory database.
    pub fn in_memory() -> Store {
        Store {
            location: Location::Memory,
            conn: Mutex::new(None),
        }
    }

    /// Runs `f` against the store connection, opening it on first use.
    ///
    /// The lock is held for the whole call, including any nested queries `f`
    /// issues on the handle, and released on every exit path.
    ///
    /// # Errors
    ///
    /// Returns the error from opening the connection or whatever `f`
    /// returns.
    pub fn with_conn<R>(&self, f: impl FnOnce(&Connection) -> Result<R>) -> Result<R> {
        let mut guard = self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.is_none() {
            let opened = match &self.location {
                Location::Path(path) => {
                    debug!(path = %path.display(), "Opening store");
                    Connection::open(path)?
                }
                Location::Memory => {
                    debug!("Opening in-memory store");
                    Connection::open_in_memory()?
                }
            };
            *guard = Some(opened);
        }
        let conn = guard.as_ref().expect("connection opened above");
        f(conn)
    }

    /// Explicit close, kept as a no-op.
    ///
    /// The legacy lifecycle held the handle open for the process's life to
    /// avoid reopen cost; callers that still call close get the same
    /// behavior. Drop the store to actually release the connection.
    pub fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_open_creates_file_on_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");
        let store = Store::open(&path);
        assert!(!path.exists());

        store
            .with_conn(|conn| {
                conn.execute("CREATE TABLE t (a VARCHAR)", [])?;
                Ok(())
            })
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_same_handle_across_calls() {
        // In-memory databases are private per connection; state surviving a
        // second call proves the handle is reused, not reopened.
        let store = Store::in_memory();
        store
            .with_conn(|conn| {
                conn.execute("CREATE TABLE t (a VARCHAR)", [])?;
                Ok(())
            })
            .unwrap();
        let count: i64 = store
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_close_is_a_no_op() {
        let store = Store::in_memory();
        store
            .with_conn(|conn| {
                conn.execute("CREATE TABLE t (a VARCHAR)", [])?;
                Ok(())
            })
            .unwrap();
        store.close();
        // Still usable after close.
        store
            .with_conn(|conn| {
                conn.execute("INSERT INTO t (a) VALUES ('x')", [])?;
                Ok(())
            })
            .unwrap();
    }
}
