//! In-place merge of a new record into an old one.

use crate::classify::Classifier;
use crate::options::PatchOptions;
use crate::record::{FieldDescriptor, FieldValue, Record};

/// Override rules applied by [`Record::load_fields`].
///
/// A thin view over [`Classifier`]: derive-generated `load_fields` asks it, per
/// field, whether the new value replaces the old one.
#[derive(Clone, Copy)]
pub struct Loader<'a> {
    classifier: Classifier<'a>,
}

impl<'a> Loader<'a> {
    pub fn new(opts: &'a PatchOptions) -> Self {
        Self {
            classifier: Classifier::new(opts),
        }
    }

    /// Whether the field takes part at all (visibility, skip, ignore rules).
    pub fn allowed(&self, field: &FieldDescriptor) -> bool {
        let allowed = self.classifier.allowed(field);
        if !allowed {
            tracing::trace!(target: "sqlpatch.load", field = field.name, "field not loaded");
        }
        allowed
    }

    /// Whether `new` replaces the current value of `field`.
    pub fn overrides(&self, field: &FieldDescriptor, new: &FieldValue<'_>) -> bool {
        self.classifier.overrides(field, new)
    }
}

/// Merge `new` into `old` in place.
///
/// Each field of `old` is replaced by the corresponding field of `new` when the
/// new value overrides it: present and non-zero, absent with nil inclusion, or
/// zero with zero inclusion. Substructures present on both sides are merged
/// recursively; a substructure present only in `new` is cloned over wholesale.
///
/// ```ignore
/// let mut current = repo.load(id)?;
/// sqlpatch::load_diff(&mut current, &incoming, &PatchOptions::new());
/// ```
pub fn load_diff<R: Record>(old: &mut R, new: &R, opts: &PatchOptions) {
    let loader = Loader::new(opts);
    tracing::debug!(
        target: "sqlpatch.load",
        record = old.descriptor().name,
        "loading diff"
    );
    old.load_fields(new, &loader);
}
