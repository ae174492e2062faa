//! Relation resolution from stored reference tokens.
//!
//! A relation column never holds data; it holds a token
//! `<TargetTable>$$<foreign-key-field>` written at insert time from the
//! field's declaration. On read, the resolver splits the token and issues a
//! secondary `SELECT` against the target table with the predicate
//! `<foreign-key-field> = '<owner primary value>'`. One-to-one takes the
//! first match, one-to-many all of them; when the owner's primary value is
//! absent or empty, the relation field keeps its zero value and nothing is
//! queried.
//!
//! No cycle detection is performed: a relation graph with a cycle will
//! recurse resolution until the stack runs out. Callers must not declare
//! cyclic graphs.

use std::any::Any;

use crate::error::{DecodeError, Result, StoreError};
use crate::registry::Session;

/// Loads the rows a relation token points at for one owning row.
///
/// `primary_value` is the owner's encoded primary-key text; callers skip
/// the call entirely when it is absent or empty.
///
/// # Errors
///
/// A token without the `$$` separator surfaces as a
/// [`DecodeError::Token`] (per-row, skippable); an unregistered target
/// table is a [`StoreError::Unregistered`] configuration error and
/// propagates.
pub(crate) fn resolve(
    session: &Session<'_>,
    token: &str,
    primary_value: &str,
) -> Result<Vec<Box<dyn Any>>> {
    let (table, key) = token
        .split_once("$$")
        .ok_or_else(|| StoreError::Decode(DecodeError::Token(token.to_string())))?;
    let ops = session.registry.get(table)?;
    let predicate = format!("{key} = '{primary_value}'");
    (ops.load_where)(session, &predicate)
}
