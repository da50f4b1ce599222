//! Static merge schema types
//!
//! Every mergeable type exposes a compile-time list of `MergeField`
//! descriptors, one `(name, kind, get, set, nested hook)` entry per property,
//! normally generated by `#[derive(Entity)]` or `#[derive(Mergeable)]` from
//! `merge-derive`. The copy algorithm in the parent module dispatches on the
//! `kind` tag rather than on runtime type tests, and a descriptor that does
//! not honor its declared kind is a contract violation that fails the whole
//! merge.

use thiserror::Error;

/// How a property participates in a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A plain value; copied wholesale when the source side is populated
    Scalar,
    /// A nested mergeable sub-object; merged recursively, field by field
    Nested,
}

/// Type-erased snapshot of a single scalar property value
///
/// `Absent` is the "caller did not set this field" marker that makes updates
/// partial: an absent source value never clobbers the destination.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Absent,
    Text(String),
    Integer(i32),
    BigInt(i64),
    Double(f64),
    Boolean(bool),
    Uuid(uuid::Uuid),
    Timestamp(chrono::DateTime<chrono::Utc>),
    Json(serde_json::Value),
}

impl FieldValue {
    /// Variant name, for contract-violation diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Absent => "Absent",
            FieldValue::Text(_) => "Text",
            FieldValue::Integer(_) => "Integer",
            FieldValue::BigInt(_) => "BigInt",
            FieldValue::Double(_) => "Double",
            FieldValue::Boolean(_) => "Boolean",
            FieldValue::Uuid(_) => "Uuid",
            FieldValue::Timestamp(_) => "Timestamp",
            FieldValue::Json(_) => "Json",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }
}

/// Accessor-pair descriptor for one mergeable property of `T`
///
/// `get` reads the property from a source instance as an erased value; `set`
/// writes an erased value onto a destination instance. For `Nested` fields the
/// scalar accessors are unused and `merge_nested` carries the recursion: it
/// receives the destination and source parents and merges their sub-objects,
/// returning how many fields it wrote.
pub struct MergeField<T> {
    pub name: &'static str,
    pub kind: FieldKind,
    pub get: fn(&T) -> FieldValue,
    pub set: fn(&mut T, FieldValue) -> Result<(), MergeError>,
    pub merge_nested: Option<fn(&mut T, &T) -> Result<usize, MergeError>>,
}

/// A type whose populated fields can be merged onto another instance
///
/// Nested sub-objects declared in the schema must themselves be `Mergeable`.
/// Because the schema is built from plain struct fields, the nested graph is a
/// finite tree; recursion over it always terminates.
pub trait Mergeable: Sized + 'static {
    fn merge_fields() -> &'static [MergeField<Self>];
}

/// A merge schema contract violation
///
/// These are programming errors in an entity type's schema, not data errors;
/// any of them aborts the whole merge rather than skipping the field.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Field '{field}' is declared {kind:?} but has no matching accessor")]
    MissingAccessor { field: &'static str, kind: FieldKind },

    #[error("Field '{field}' expected a {expected} value but received {found}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

impl MergeError {
    pub fn missing_accessor(field: &'static str, kind: FieldKind) -> Self {
        Self::MissingAccessor { field, kind }
    }

    pub fn type_mismatch(
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            field,
            expected,
            found,
        }
    }
}
