//! Entity descriptors: the checked, classified form of field declarations.
//!
//! [`EntityDescriptor::derive`] turns a type's raw [`FieldSpec`] slice into
//! the descriptor the storage engine consumes. Derivation drops ignored
//! fields and any field named after the reserved row identifier, classifies
//! each survivor into the closed [`FieldKind`] union, and rejects
//! declarations the engine could not store faithfully. A type with a bad
//! declaration fails here, once, rather than misbehaving per operation.
//!
//! # Examples
//!
//! ```
//! use record_store_core::{ElemKind, EntityDescriptor, FieldKind, FieldSpec};
//!
//! let desc = EntityDescriptor::derive(
//!     "DownloadTask",
//!     &[
//!         FieldSpec::text("url").primary(),
//!         FieldSpec::long("state"),
//!         FieldSpec::list("chunk_offsets", ElemKind::Int),
//!         FieldSpec::text("scratch").ignored(),
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(desc.table(), "DownloadTask");
//! assert_eq!(desc.fields().len(), 3); // scratch is ignored
//! assert_eq!(desc.column_count(), 4); // + implicit rowid
//! assert_eq!(desc.primary().unwrap().name, "url");
//! assert_eq!(desc.fields()[2].kind, FieldKind::List(ElemKind::Int));
//! ```

use thiserror::Error;

use crate::field::{DeclaredKind, ElemKind, FieldSpec};

/// Name of the store-managed row identifier column.
///
/// The engine selects and populates it on every read; declared fields with
/// this name (compared case-insensitively) are excluded from descriptors so
/// a record type cannot shadow it.
pub const ROW_ID_NAME: &str = "rowid";

/// Classified relation target carried inside [`FieldKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationRef {
    /// Table name of the related type.
    pub table: &'static str,
    /// Field in the related type matched against the owner's primary value.
    pub key: &'static str,
}

/// Classified field kind.
///
/// Unlike [`DeclaredKind`], every variant here carries the metadata the
/// engine needs: a list knows its element kind, a relation knows its target.
/// Classification is total over descriptors — downstream code matches on
/// this enum without re-checking the raw declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Integer column.
    Int,
    /// 64-bit integer column.
    Long,
    /// Single-precision float column.
    Float,
    /// Double-precision float column.
    Double,
    /// Boolean column.
    Bool,
    /// Text column.
    Text,
    /// Byte-array column (stored as hex text).
    Bytes,
    /// Timestamp column.
    Date,
    /// Ordered string-pair map, one text column.
    Map,
    /// Ordered scalar list, one text column.
    List(ElemKind),
    /// Single related row, resolved on read.
    OneToOne(RelationRef),
    /// All matching related rows, resolved on read.
    OneToMany(RelationRef),
}

impl FieldKind {
    /// Whether this kind stores a relation token rather than a value.
    pub fn is_relation(&self) -> bool {
        matches!(self, FieldKind::OneToOne(_) | FieldKind::OneToMany(_))
    }
}

/// One stored column of an entity: name, classified kind, primary marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Stored column name.
    pub name: &'static str,
    /// Classified kind.
    pub kind: FieldKind,
    /// Whether this is the type's primary identity field.
    pub primary: bool,
}

/// Checked, classified description of one persistable type.
///
/// Field order follows declaration order and fixes the column order of every
/// generated statement. The implicit row identifier is not listed; it is
/// accounted for in [`column_count`](EntityDescriptor::column_count).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    table: &'static str,
    fields: Vec<FieldDescriptor>,
    primary: Option<usize>,
}

/// A field declaration the engine cannot store faithfully.
///
/// Derivation errors are configuration mistakes: they surface when a type is
/// registered, before any data is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// A list field was declared without an element kind.
    #[error("list field '{0}' declares no element kind")]
    MissingElementKind(&'static str),

    /// A relation field was declared without a target table and key.
    #[error("relation field '{0}' declares no target table and key")]
    MissingRelation(&'static str),

    /// Two non-ignored fields both carry the primary marker.
    #[error("fields '{first}' and '{second}' are both marked primary")]
    DuplicatePrimary {
        /// First field marked primary, in declaration order.
        first: &'static str,
        /// Second field marked primary.
        second: &'static str,
    },

    /// A relation field was declared on a type with no primary field, so it
    /// could never resolve.
    #[error("relation field '{0}' requires a primary field on the declaring type")]
    RelationWithoutPrimary(&'static str),

    /// Every declared field was ignored or reserved; there is nothing to
    /// store.
    #[error("table '{0}' has no persistable fields")]
    NoFields(&'static str),
}

impl EntityDescriptor {
    /// Derives the descriptor for `table` from raw field declarations.
    ///
    /// Ignored fields and fields named [`ROW_ID_NAME`] (any ASCII case) are
    /// dropped. Remaining declarations are classified and checked.
    ///
    /// # Errors
    ///
    /// Returns a [`DescriptorError`] when a list lacks an element kind, a
    /// relation lacks its target, more than one field is marked primary, a
    /// relation is declared without any primary field, or no field survives
    /// exclusion.
    pub fn derive(
        table: &'static str,
        specs: &[FieldSpec],
    ) -> Result<EntityDescriptor, DescriptorError> {
        let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(specs.len());
        let mut primary: Option<usize> = None;
        let mut first_relation: Option<&'static str> = None;

        for spec in specs {
            if spec.ignore || spec.name.eq_ignore_ascii_case(ROW_ID_NAME) {
                continue;
            }

            let kind = classify(spec)?;
            if kind.is_relation() && first_relation.is_none() {
                first_relation = Some(spec.name);
            }

            if spec.primary {
                if let Some(existing) = primary {
                    return Err(DescriptorError::DuplicatePrimary {
                        first: fields[existing].name,
                        second: spec.name,
                    });
                }
                primary = Some(fields.len());
            }

            fields.push(FieldDescriptor {
                name: spec.name,
                kind,
                primary: spec.primary,
            });
        }

        if fields.is_empty() {
            return Err(DescriptorError::NoFields(table));
        }
        if primary.is_none() {
            if let Some(name) = first_relation {
                return Err(DescriptorError::RelationWithoutPrimary(name));
            }
        }

        Ok(EntityDescriptor { table, fields, primary })
    }

    /// Table this descriptor maps to.
    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Stored fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// The primary identity field, if one was declared.
    pub fn primary(&self) -> Option<&FieldDescriptor> {
        self.primary.map(|i| &self.fields[i])
    }

    /// Number of stored columns including the implicit row identifier.
    ///
    /// This is the count a `SELECT rowid, *` against a freshly created table
    /// reports, and the number the migration engine compares against.
    pub fn column_count(&self) -> usize {
        self.fields.len() + 1
    }
}

fn classify(spec: &FieldSpec) -> Result<FieldKind, DescriptorError> {
    let kind = match spec.kind {
        DeclaredKind::Int => FieldKind::Int,
        DeclaredKind::Long => FieldKind::Long,
        DeclaredKind::Float => FieldKind::Float,
        DeclaredKind::Double => FieldKind::Double,
        DeclaredKind::Bool => FieldKind::Bool,
        DeclaredKind::Text => FieldKind::Text,
        DeclaredKind::Bytes => FieldKind::Bytes,
        DeclaredKind::Date => FieldKind::Date,
        DeclaredKind::Map => FieldKind::Map,
        DeclaredKind::List => match spec.elem {
            Some(elem) => FieldKind::List(elem),
            None => return Err(DescriptorError::MissingElementKind(spec.name)),
        },
        DeclaredKind::OneToOne => FieldKind::OneToOne(relation_ref(spec)?),
        DeclaredKind::OneToMany => FieldKind::OneToMany(relation_ref(spec)?),
    };
    Ok(kind)
}

fn relation_ref(spec: &FieldSpec) -> Result<RelationRef, DescriptorError> {
    match spec.relation {
        Some(rel) => Ok(RelationRef { table: rel.table, key: rel.key }),
        None => Err(DescriptorError::MissingRelation(spec.name)),
    }
}
