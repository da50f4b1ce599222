//! Recursive field-copy for partial entity updates
//!
//! This module is the merge half of `HandleStore::update`: given a freshly
//! loaded persisted instance and a detached value object of the same type,
//! copy every populated field of the value object onto the persisted instance,
//! recursing into nested mergeable sub-objects and leaving everything the
//! caller did not populate untouched.

mod schema;

pub use schema::{FieldKind, FieldValue, MergeError, MergeField, Mergeable};

/// Copy all populated fields from `incoming` onto `existing`
///
/// Walks `T`'s static merge schema and, per field, dispatches on its kind tag:
///
/// - `Nested` fields recurse through the field's `merge_nested` hook. An
///   incoming sub-object that is absent is skipped; when both sides are
///   present the sub-objects are merged field by field, so absent fields
///   inside the incoming sub-object are preserved too; an incoming sub-object
///   with no existing counterpart is installed wholesale.
/// - `Scalar` fields are fetched from `incoming`; an absent value is skipped
///   (this is what makes the update partial), a populated value overwrites
///   the destination unconditionally.
///
/// Fields are independent; the walk imposes no ordering contract beyond
/// schema declaration order. Returns the number of fields written. Any
/// [`MergeError`] aborts the merge; callers running inside a transaction are
/// expected to roll back, discarding whatever was already copied in memory.
pub fn copy_persistent_fields<T: Mergeable>(
    existing: &mut T,
    incoming: &T,
) -> Result<usize, MergeError> {
    let mut copied = 0;

    for field in T::merge_fields() {
        match field.kind {
            FieldKind::Nested => {
                let merge_nested = field
                    .merge_nested
                    .ok_or_else(|| MergeError::missing_accessor(field.name, field.kind))?;
                copied += merge_nested(existing, incoming)?;
            }
            FieldKind::Scalar => match (field.get)(incoming) {
                FieldValue::Absent => {}
                value => {
                    (field.set)(existing, value)?;
                    copied += 1;
                }
            },
        }
    }

    Ok(copied)
}
