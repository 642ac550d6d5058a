//! Field inclusion policy.

use crate::options::PatchOptions;
use crate::record::{FieldDescriptor, FieldKind, FieldValue};
use std::fmt;

/// Why a field was left out of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Not `pub`.
    Hidden,
    /// `skip` directive.
    Skipped,
    /// Listed in the ignored fields.
    Ignored,
    /// Rejected by the ignore predicate.
    IgnoredByFn,
    /// Absent and nil inclusion is off.
    Nil,
    /// Zero and zero inclusion is off.
    Zero,
    /// Cannot be bound as a parameter.
    NonStorable,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Exclusion::Hidden => "not visible",
            Exclusion::Skipped => "skip directive",
            Exclusion::Ignored => "ignored field",
            Exclusion::IgnoredByFn => "ignore predicate",
            Exclusion::Nil => "nil value",
            Exclusion::Zero => "zero value",
            Exclusion::NonStorable => "non-storable kind",
        })
    }
}

/// Decides field inclusion from directives, call options and current value.
///
/// Rules apply in order and the first match wins:
///
/// 1. private fields are excluded
/// 2. `skip` directive
/// 3. ignored field names (case-insensitive)
/// 4. ignore predicate
/// 5. absent values need nil inclusion (call-level or `allow_nil`)
/// 6. zero values of required fields need zero inclusion (call-level or `allow_zero`)
/// 7. everything else is included
#[derive(Clone, Copy)]
pub struct Classifier<'a> {
    opts: &'a PatchOptions,
}

impl<'a> Classifier<'a> {
    pub fn new(opts: &'a PatchOptions) -> Self {
        Self { opts }
    }

    /// Value-independent rules (1-4).
    pub fn check_field(&self, field: &FieldDescriptor) -> Result<(), Exclusion> {
        if !field.visible {
            return Err(Exclusion::Hidden);
        }
        if field.policy(&self.opts.tag_name).skip {
            return Err(Exclusion::Skipped);
        }
        if self.is_ignored(field.name) {
            return Err(Exclusion::Ignored);
        }
        if self
            .opts
            .ignore_fields_fn
            .as_ref()
            .is_some_and(|ignore| ignore(field))
        {
            return Err(Exclusion::IgnoredByFn);
        }
        Ok(())
    }

    pub fn allowed(&self, field: &FieldDescriptor) -> bool {
        self.check_field(field).is_ok()
    }

    /// All rules (1-7).
    pub fn classify(&self, field: &FieldDescriptor, value: &FieldValue<'_>) -> Result<(), Exclusion> {
        self.check_field(field)?;
        match value {
            FieldValue::NonStorable => Err(Exclusion::NonStorable),
            FieldValue::Absent if !self.include_nil(field) => Err(Exclusion::Nil),
            FieldValue::Value(v)
                if !field.kind.is_optional() && v.is_zero() && !self.include_zero(field) =>
            {
                Err(Exclusion::Zero)
            }
            _ => Ok(()),
        }
    }

    pub fn should_include(&self, field: &FieldDescriptor, value: &FieldValue<'_>) -> bool {
        self.classify(field, value).is_ok()
    }

    /// Whether `value`, taken from the new record, replaces the old value.
    ///
    /// Same rules as [`Classifier::classify`]; present optional values always
    /// override, absent substructures and non-storable fields never do.
    pub fn overrides(&self, field: &FieldDescriptor, value: &FieldValue<'_>) -> bool {
        if field.kind == FieldKind::NonStorable {
            return false;
        }
        match value {
            FieldValue::Absent if field.kind.is_record() => false,
            _ => self.should_include(field, value),
        }
    }

    pub fn include_nil(&self, field: &FieldDescriptor) -> bool {
        self.opts.include_nil_values || field.policy(&self.opts.tag_name).allow_nil
    }

    pub fn include_zero(&self, field: &FieldDescriptor) -> bool {
        self.opts.include_zero_values || field.policy(&self.opts.tag_name).allow_zero
    }

    /// Ignored names and field names are compared with Unicode lowercasing.
    fn is_ignored(&self, name: &str) -> bool {
        if self.opts.ignored_fields.is_empty() {
            return false;
        }
        let name = name.to_lowercase();
        self.opts
            .ignored_fields
            .iter()
            .any(|ignored| ignored.to_lowercase() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn field(name: &'static str, kind: FieldKind, tags: &'static [(&'static str, &'static str)]) -> FieldDescriptor {
        FieldDescriptor {
            name,
            tags,
            kind,
            embedded: false,
            visible: true,
        }
    }

    fn int(v: i64) -> FieldValue<'static> {
        FieldValue::Value(Value::Int(v))
    }

    #[test]
    fn test_hidden_field_excluded() {
        let opts = PatchOptions::new().include_zero_values();
        let mut f = field("id", FieldKind::Scalar, &[]);
        f.visible = false;
        assert_eq!(Classifier::new(&opts).classify(&f, &int(1)), Err(Exclusion::Hidden));
    }

    #[test]
    fn test_skip_beats_everything() {
        let opts = PatchOptions::new().include_zero_values().include_nil_values();
        let f = field("id", FieldKind::Scalar, &[("patch", "skip")]);
        assert_eq!(Classifier::new(&opts).classify(&f, &int(1)), Err(Exclusion::Skipped));
    }

    #[test]
    fn test_ignore_list_case_insensitive() {
        let opts = PatchOptions::new().ignored_fields(["Description"]);
        let c = Classifier::new(&opts);
        let f = field("description", FieldKind::Scalar, &[]);
        assert_eq!(c.classify(&f, &int(1)), Err(Exclusion::Ignored));
        let f = field("DESCRIPTION", FieldKind::Scalar, &[]);
        assert_eq!(c.classify(&f, &int(1)), Err(Exclusion::Ignored));
        let f = field("desc", FieldKind::Scalar, &[]);
        assert_eq!(c.classify(&f, &int(1)), Ok(()));
    }

    #[test]
    fn test_ignore_list_folds_non_ascii() {
        let opts = PatchOptions::new().ignored_fields(["ÄRGER"]);
        let c = Classifier::new(&opts);
        let f = field("ärger", FieldKind::Scalar, &[]);
        assert_eq!(c.classify(&f, &int(1)), Err(Exclusion::Ignored));

        // entries pushed directly, without the builder, fold the same way
        let mut opts = PatchOptions::new();
        opts.ignored_fields.push("Ärger".to_string());
        assert!(!Classifier::new(&opts).allowed(&f));
    }

    #[test]
    fn test_ignore_predicate() {
        let opts = PatchOptions::new().ignore_fields_fn(|f| f.name.starts_with("internal_"));
        let c = Classifier::new(&opts);
        let f = field("internal_rev", FieldKind::Scalar, &[]);
        assert_eq!(c.classify(&f, &int(1)), Err(Exclusion::IgnoredByFn));
        let f = field("rev", FieldKind::Scalar, &[]);
        assert!(c.should_include(&f, &int(1)));
    }

    #[test]
    fn test_nil_rules() {
        let f = field("name", FieldKind::OptionalScalar, &[]);
        let opts = PatchOptions::new();
        assert_eq!(Classifier::new(&opts).classify(&f, &FieldValue::Absent), Err(Exclusion::Nil));

        let opts = PatchOptions::new().include_nil_values();
        assert!(Classifier::new(&opts).should_include(&f, &FieldValue::Absent));

        let f = field("name", FieldKind::OptionalScalar, &[("patch", "allow_nil")]);
        let opts = PatchOptions::new();
        assert!(Classifier::new(&opts).should_include(&f, &FieldValue::Absent));

        // include-zero alone does not admit absent values
        let f = field("name", FieldKind::OptionalScalar, &[]);
        let opts = PatchOptions::new().include_zero_values();
        assert!(!Classifier::new(&opts).should_include(&f, &FieldValue::Absent));
    }

    #[test]
    fn test_zero_rules() {
        let f = field("age", FieldKind::Scalar, &[]);
        let opts = PatchOptions::new();
        assert_eq!(Classifier::new(&opts).classify(&f, &int(0)), Err(Exclusion::Zero));

        let opts = PatchOptions::new().include_zero_values();
        assert!(Classifier::new(&opts).should_include(&f, &int(0)));

        let f = field("age", FieldKind::Scalar, &[("patch", "omitempty")]);
        let opts = PatchOptions::new();
        assert!(Classifier::new(&opts).should_include(&f, &int(0)));
    }

    #[test]
    fn test_present_optional_zero_is_included() {
        let f = field("age", FieldKind::OptionalScalar, &[]);
        let opts = PatchOptions::new();
        assert!(Classifier::new(&opts).should_include(&f, &int(0)));
    }

    #[test]
    fn test_non_storable() {
        let f = field("tx", FieldKind::NonStorable, &[]);
        let opts = PatchOptions::new().include_zero_values().include_nil_values();
        assert_eq!(
            Classifier::new(&opts).classify(&f, &FieldValue::NonStorable),
            Err(Exclusion::NonStorable)
        );
    }

    #[test]
    fn test_non_storable_never_overrides() {
        let f = field("on_change", FieldKind::NonStorable, &[]);
        let opts = PatchOptions::new().include_nil_values();
        assert!(!Classifier::new(&opts).overrides(&f, &FieldValue::Absent));
    }

    #[test]
    fn test_absent_substructure_never_overrides() {
        let f = field("address", FieldKind::OptionalRecord, &[]);
        let opts = PatchOptions::new().include_nil_values();
        assert!(!Classifier::new(&opts).overrides(&f, &FieldValue::Absent));
    }

    #[test]
    fn test_deterministic() {
        let f = field("age", FieldKind::Scalar, &[("patch", "allow_zero")]);
        let opts = PatchOptions::new();
        let c = Classifier::new(&opts);
        let first = c.classify(&f, &int(0));
        for _ in 0..10 {
            assert_eq!(c.classify(&f, &int(0)), first);
        }
    }
}
