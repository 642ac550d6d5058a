//! Old/new comparison yielding a minimal set of changed columns.

use crate::error::{PatchError, PatchResult};
use crate::options::PatchOptions;
use crate::record::{FieldKind, FieldValue, Record, RecordDescriptor};
use crate::walk::{ColumnValue, Walker, into_value, trace_excluded};

/// Columns whose value in `new` overrides, and differs from, `old`.
///
/// Neither record is modified. Fields are compared pairwise in declaration
/// order:
///
/// - a scalar is emitted when the new value overrides the old one (see
///   [`crate::Classifier::overrides`]) and the two differ;
/// - substructures present on both sides are compared recursively;
/// - a substructure present only in `new` is emitted whole;
/// - a substructure absent from `new` never changes anything.
///
/// Returns [`PatchError::NoChanges`] when nothing differs.
pub fn diff(old: &dyn Record, new: &dyn Record, opts: &PatchOptions) -> PatchResult<Vec<ColumnValue>> {
    let walker = Walker::new(opts);
    let mut out = Vec::new();
    diff_into(&walker, opts, old, new, &mut out)?;
    if out.is_empty() {
        tracing::debug!(
            target: "sqlpatch.diff",
            record = old.descriptor().name,
            "no changes detected"
        );
        return Err(PatchError::NoChanges);
    }
    Ok(out)
}

fn diff_into(
    walker: &Walker<'_>,
    opts: &PatchOptions,
    old: &dyn Record,
    new: &dyn Record,
    out: &mut Vec<ColumnValue>,
) -> PatchResult<()> {
    let descriptor = old.descriptor();
    if !same_type(descriptor, new.descriptor()) {
        return Err(PatchError::invalid(format!(
            "cannot diff {} against {}",
            descriptor.name,
            new.descriptor().name
        )));
    }

    let classifier = walker.classifier();
    for (index, field) in descriptor.fields.iter().enumerate() {
        if let Err(reason) = classifier.check_field(field) {
            trace_excluded(field, reason);
            continue;
        }
        if field.kind == FieldKind::NonStorable {
            walker.non_storable(field)?;
            continue;
        }
        match (old.field(index), new.field(index)) {
            (FieldValue::Record(before), FieldValue::Record(after)) => {
                diff_into(walker, opts, before, after, out)?;
            }
            (_, FieldValue::Record(after)) => walker.walk_into(after, out)?,
            (_, FieldValue::Absent) if field.kind.is_record() => {}
            (before, after) => {
                if !classifier.overrides(field, &after) {
                    continue;
                }
                if before.same_scalar(&after) {
                    tracing::trace!(target: "sqlpatch.diff", field = field.name, "unchanged");
                    continue;
                }
                out.push((field.column(&opts.tag_name), into_value(after)));
            }
        }
    }
    Ok(())
}

/// Each record type owns exactly one static descriptor.
fn same_type(a: &RecordDescriptor, b: &RecordDescriptor) -> bool {
    std::ptr::eq(a, b)
}
