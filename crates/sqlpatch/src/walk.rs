//! Record traversal into ordered (column, value) pairs.

use crate::classify::{Classifier, Exclusion};
use crate::error::{PatchError, PatchResult};
use crate::options::PatchOptions;
use crate::record::{FieldDescriptor, FieldKind, FieldValue, Record};
use crate::value::Value;

/// One walked column and the value bound to it.
pub type ColumnValue = (&'static str, Value);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Value rules (nil/zero) apply.
    Patch,
    /// Every allowed storable field, primary keys optional.
    Insert,
}

/// Flattens a record into columns.
///
/// Fields are visited in declaration order. Embedded and nested records are
/// flattened into the same list; an absent optional record contributes no
/// columns.
#[derive(Clone, Copy)]
pub struct Walker<'a> {
    opts: &'a PatchOptions,
    classifier: Classifier<'a>,
    mode: Mode,
}

impl<'a> Walker<'a> {
    /// Walker for UPDATE statements.
    pub fn new(opts: &'a PatchOptions) -> Self {
        Self {
            opts,
            classifier: Classifier::new(opts),
            mode: Mode::Patch,
        }
    }

    /// Walker for INSERT statements: zero and absent values are kept as-is,
    /// primary key fields are dropped unless `include_primary_key` is set.
    pub fn for_insert(opts: &'a PatchOptions) -> Self {
        Self {
            mode: Mode::Insert,
            ..Self::new(opts)
        }
    }

    pub fn walk(&self, record: &dyn Record) -> PatchResult<Vec<ColumnValue>> {
        let mut out = Vec::with_capacity(record.descriptor().fields.len());
        self.walk_into(record, &mut out)?;
        Ok(out)
    }

    pub(crate) fn walk_into(&self, record: &dyn Record, out: &mut Vec<ColumnValue>) -> PatchResult<()> {
        let descriptor = record.descriptor();
        for (index, field) in descriptor.fields.iter().enumerate() {
            if let Err(reason) = self.classifier.check_field(field) {
                trace_excluded(field, reason);
                continue;
            }
            if field.kind == FieldKind::NonStorable {
                self.non_storable(field)?;
                continue;
            }
            match record.field(index) {
                FieldValue::Record(nested) => self.walk_into(nested, out)?,
                FieldValue::Absent if field.kind.is_record() => {}
                FieldValue::NonStorable => self.non_storable(field)?,
                value => {
                    if let Some(value) = self.include(field, value) {
                        out.push((field.column(&self.opts.tag_name), value));
                    }
                }
            }
        }
        Ok(())
    }

    /// Apply the value rules of the current mode to an allowed scalar.
    fn include(&self, field: &FieldDescriptor, value: FieldValue<'_>) -> Option<Value> {
        match self.mode {
            Mode::Patch => {
                if let Err(reason) = self.classifier.classify(field, &value) {
                    trace_excluded(field, reason);
                    return None;
                }
            }
            Mode::Insert => {
                if !self.opts.include_primary_key && field.policy(&self.opts.tag_name).primary_key {
                    tracing::trace!(target: "sqlpatch.walk", field = field.name, "primary key left out of insert");
                    return None;
                }
            }
        }
        Some(into_value(value))
    }

    pub(crate) fn non_storable(&self, field: &FieldDescriptor) -> PatchResult<()> {
        if self.opts.strict {
            return Err(PatchError::unsupported(field.name));
        }
        trace_excluded(field, Exclusion::NonStorable);
        Ok(())
    }

    pub(crate) fn classifier(&self) -> &Classifier<'a> {
        &self.classifier
    }
}

/// Scalar payload of a field value; absent becomes `NULL`.
pub(crate) fn into_value(value: FieldValue<'_>) -> Value {
    match value {
        FieldValue::Value(v) => v,
        _ => Value::Null,
    }
}

pub(crate) fn trace_excluded(field: &FieldDescriptor, reason: Exclusion) {
    tracing::trace!(
        target: "sqlpatch.walk",
        field = field.name,
        reason = %reason,
        "field excluded"
    );
}
