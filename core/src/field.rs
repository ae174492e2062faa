//! Field declarations for persistable record types.
//!
//! A record type describes its persisted shape as a static slice of
//! [`FieldSpec`] values. Every constructor here is `const`, so declarations
//! live in `static` data and carry no runtime cost:
//!
//! ```
//! use record_store_core::{ElemKind, FieldSpec};
//!
//! static FIELDS: &[FieldSpec] = &[
//!     FieldSpec::text("url").primary(),
//!     FieldSpec::long("state"),
//!     FieldSpec::list("chunk_offsets", ElemKind::Int),
//!     FieldSpec::text("scratch").ignored(),
//! ];
//!
//! assert!(FIELDS[0].primary);
//! assert!(FIELDS[3].ignore);
//! ```
//!
//! Declarations are raw and may be inconsistent (a list without an element
//! kind, two primaries); [`EntityDescriptor::derive`](crate::EntityDescriptor::derive)
//! checks them and produces the classified form the engine consumes.

/// Declared type of a persisted field, before classification.
///
/// Scalar kinds map one-to-one onto stored column affinities; `Map` and
/// `List` are encoded into a single text column; `OneToOne` and `OneToMany`
/// columns store a reference token and are filled in by the relation
/// resolver on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredKind {
    /// 32-bit-ish integer (stored with integer affinity).
    Int,
    /// 64-bit integer.
    Long,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// Boolean.
    Bool,
    /// Free-form text.
    Text,
    /// Raw bytes, stored as lowercase hex text.
    Bytes,
    /// Timestamp without timezone.
    Date,
    /// Ordered string-to-string pairs, encoded into one text column.
    Map,
    /// Ordered list of scalars; requires an element kind.
    List,
    /// Reference to a single row of another registered type.
    OneToOne,
    /// Reference to all matching rows of another registered type.
    OneToMany,
}

/// Element type of a [`DeclaredKind::List`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElemKind {
    /// Text elements.
    Text,
    /// Integer elements.
    Int,
    /// Single-precision float elements.
    Float,
    /// Double-precision float elements.
    Double,
}

/// Target of a relation field: the related type's table and the field in it
/// that holds the owning row's primary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationSpec {
    /// Table name of the related type.
    pub table: &'static str,
    /// Field in the related type matched against the owner's primary value.
    pub key: &'static str,
}

/// One declared field of a persistable type.
///
/// Built with the kind-specific constructors ([`text`](FieldSpec::text),
/// [`long`](FieldSpec::long), [`list`](FieldSpec::list),
/// [`one_to_many`](FieldSpec::one_to_many), ...) and refined with
/// [`primary`](FieldSpec::primary) and [`ignored`](FieldSpec::ignored).
///
/// # Examples
///
/// ```
/// use record_store_core::{DeclaredKind, FieldSpec};
///
/// let f = FieldSpec::text("url").primary();
/// assert_eq!(f.name, "url");
/// assert_eq!(f.kind, DeclaredKind::Text);
/// assert!(f.primary);
///
/// let rel = FieldSpec::one_to_many("entries", "LogEntry", "task_url");
/// assert!(rel.relation.is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Stored column name.
    pub name: &'static str,
    /// Declared type.
    pub kind: DeclaredKind,
    /// Marks the unique-identity field used to resolve relations.
    pub primary: bool,
    /// Excludes the field from storage entirely.
    pub ignore: bool,
    /// Element kind, required when `kind` is [`DeclaredKind::List`].
    pub elem: Option<ElemKind>,
    /// Relation target, required for relation kinds.
    pub relation: Option<RelationSpec>,
}

impl FieldSpec {
    /// Creates a bare declaration of the given kind.
    ///
    /// The kind-specific constructors below are usually clearer; this is the
    /// escape hatch for building declarations programmatically.
    pub const fn new(name: &'static str, kind: DeclaredKind) -> Self {
        Self {
            name,
            kind,
            primary: false,
            ignore: false,
            elem: None,
            relation: None,
        }
    }

    /// Declares an integer field.
    pub const fn int(name: &'static str) -> Self {
        Self::new(name, DeclaredKind::Int)
    }

    /// Declares a 64-bit integer field.
    pub const fn long(name: &'static str) -> Self {
        Self::new(name, DeclaredKind::Long)
    }

    /// Declares a single-precision float field.
    pub const fn float(name: &'static str) -> Self {
        Self::new(name, DeclaredKind::Float)
    }

    /// Declares a double-precision float field.
    pub const fn double(name: &'static str) -> Self {
        Self::new(name, DeclaredKind::Double)
    }

    /// Declares a boolean field.
    pub const fn bool(name: &'static str) -> Self {
        Self::new(name, DeclaredKind::Bool)
    }

    /// Declares a text field.
    pub const fn text(name: &'static str) -> Self {
        Self::new(name, DeclaredKind::Text)
    }

    /// Declares a byte-array field.
    pub const fn bytes(name: &'static str) -> Self {
        Self::new(name, DeclaredKind::Bytes)
    }

    /// Declares a timestamp field.
    pub const fn date(name: &'static str) -> Self {
        Self::new(name, DeclaredKind::Date)
    }

    /// Declares an ordered string-pair map field.
    pub const fn map(name: &'static str) -> Self {
        Self::new(name, DeclaredKind::Map)
    }

    /// Declares an ordered list field with the given element kind.
    pub const fn list(name: &'static str, elem: ElemKind) -> Self {
        let mut spec = Self::new(name, DeclaredKind::List);
        spec.elem = Some(elem);
        spec
    }

    /// Declares a reference to a single row of `table` whose `key` field
    /// holds this record's primary value.
    pub const fn one_to_one(name: &'static str, table: &'static str, key: &'static str) -> Self {
        let mut spec = Self::new(name, DeclaredKind::OneToOne);
        spec.relation = Some(RelationSpec { table, key });
        spec
    }

    /// Declares a reference to every row of `table` whose `key` field holds
    /// this record's primary value.
    pub const fn one_to_many(name: &'static str, table: &'static str, key: &'static str) -> Self {
        let mut spec = Self::new(name, DeclaredKind::OneToMany);
        spec.relation = Some(RelationSpec { table, key });
        spec
    }

    /// Marks this field as the type's primary identity.
    ///
    /// At most one non-ignored field may carry the mark; relation resolution
    /// requires one.
    pub const fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Excludes this field from storage.
    pub const fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_builders() {
        static FIELDS: &[FieldSpec] = &[
            FieldSpec::text("url").primary(),
            FieldSpec::list("parts", ElemKind::Float),
            FieldSpec::one_to_one("detail", "TaskDetail", "task_url"),
            FieldSpec::int("tmp").ignored(),
        ];

        assert!(FIELDS[0].primary);
        assert_eq!(FIELDS[1].elem, Some(ElemKind::Float));
        assert_eq!(
            FIELDS[2].relation,
            Some(RelationSpec { table: "TaskDetail", key: "task_url" })
        );
        assert!(FIELDS[3].ignore);
    }

    #[test]
    fn test_bare_declaration_has_no_metadata() {
        let spec = FieldSpec::new("raw", DeclaredKind::List);
        assert!(spec.elem.is_none());
        assert!(spec.relation.is_none());
        assert!(!spec.primary);
        assert!(!spec.ignore);
    }
}
