//! Record metadata: descriptor tables and per-field value access.
//!
//! Records are normally described with `#[derive(Record)]`, which emits a
//! static [`RecordDescriptor`] and index-based field access. No runtime
//! reflection is involved.

use crate::load::Loader;
use crate::tag::{self, TagPolicy};
use crate::value::Value;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::marker::PhantomData;
use std::sync::{Arc, mpsc};
use uuid::Uuid;

/// Storage kind of a field, derived from its Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A bindable value (`i64`, `String`, ...).
    Scalar,
    /// `Option` of a bindable value.
    OptionalScalar,
    /// A nested record, flattened into the parent.
    Record,
    /// `Option` of a nested record.
    OptionalRecord,
    /// A value that cannot be bound as a parameter (channels, callables).
    NonStorable,
}

impl FieldKind {
    /// The kind of `Option<T>` given the kind of `T`.
    pub const fn optional(self) -> Self {
        match self {
            FieldKind::Scalar => FieldKind::OptionalScalar,
            FieldKind::Record => FieldKind::OptionalRecord,
            other => other,
        }
    }

    pub const fn is_optional(self) -> bool {
        matches!(self, FieldKind::OptionalScalar | FieldKind::OptionalRecord)
    }

    pub const fn is_record(self) -> bool {
        matches!(self, FieldKind::Record | FieldKind::OptionalRecord)
    }
}

/// Static description of one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Rust field name.
    pub name: &'static str,
    /// Raw tag strings keyed by tag name, e.g. `("db", "id,pk")`.
    pub tags: &'static [(&'static str, &'static str)],
    pub kind: FieldKind,
    /// Declared with `#[sqlpatch(embed)]`.
    pub embedded: bool,
    /// Declared `pub`; private fields never take part in a statement.
    pub visible: bool,
}

impl FieldDescriptor {
    /// Raw value of a tag.
    pub fn tag(&self, name: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, raw)| *raw)
    }

    /// Column name under the given storage tag, falling back to the field name.
    pub fn column(&self, storage_tag: &str) -> &'static str {
        self.tag(storage_tag)
            .and_then(tag::column_name)
            .unwrap_or(self.name)
    }

    /// Effective directives under the given storage tag.
    pub fn policy(&self, storage_tag: &str) -> TagPolicy {
        TagPolicy::for_field(self.tag(storage_tag), self.tag(tag::DIRECTIVE_TAG))
    }
}

/// Static description of a record type.
#[derive(Debug, Clone, Copy)]
pub struct RecordDescriptor {
    /// Rust type name.
    pub name: &'static str,
    /// Default table, from `#[sqlpatch(table = "...")]`.
    pub table: Option<&'static str>,
    /// Fields in declaration order.
    pub fields: &'static [FieldDescriptor],
}

/// Current value of a field as seen by the walker.
#[derive(Debug)]
pub enum FieldValue<'a> {
    /// A present scalar.
    Value(Value),
    /// An empty `Option`.
    Absent,
    /// A present nested record.
    Record(&'a dyn Record),
    /// Cannot be bound.
    NonStorable,
}

impl FieldValue<'_> {
    /// Scalar equality; records and non-storable values never compare equal.
    pub fn same_scalar(&self, other: &FieldValue<'_>) -> bool {
        match (self, other) {
            (FieldValue::Value(a), FieldValue::Value(b)) => a == b,
            (FieldValue::Absent, FieldValue::Absent) => true,
            _ => false,
        }
    }
}

/// A structured value that can be walked into columns.
pub trait Record {
    /// Descriptor table of this record type.
    fn descriptor(&self) -> &'static RecordDescriptor;

    /// Value of the field at `index` in [`RecordDescriptor::fields`].
    fn field(&self, index: usize) -> FieldValue<'_>;

    /// Merge `source` into `self` field by field according to `loader`.
    fn load_fields(&mut self, source: &Self, loader: &Loader<'_>)
    where
        Self: Sized;
}

impl std::fmt::Debug for dyn Record + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("type", &self.descriptor().name)
            .finish_non_exhaustive()
    }
}

/// A type usable as a record field.
///
/// Implemented for the common scalar types, `Option<T>`, `Box<T>`, `Arc<T>`,
/// the non-storable kinds (channels, closures, `fn` pointers) and, through the
/// derive, for every record type (so records nest). Private and skipped fields
/// of a derived record need no impl.
pub trait PatchField {
    const KIND: FieldKind;

    fn field_value(&self) -> FieldValue<'_>;

    /// Overwrite `self` with `source` where the loader's override rule allows.
    fn load_from(&mut self, source: &Self, field: &FieldDescriptor, loader: &Loader<'_>);
}

macro_rules! scalar_field {
    ($($t:ty),* $(,)?) => {
        $(
            impl PatchField for $t {
                const KIND: FieldKind = FieldKind::Scalar;

                fn field_value(&self) -> FieldValue<'_> {
                    FieldValue::Value(Value::from(self.clone()))
                }

                fn load_from(&mut self, source: &Self, field: &FieldDescriptor, loader: &Loader<'_>) {
                    if loader.overrides(field, &source.field_value()) {
                        self.clone_from(source);
                    }
                }
            }
        )*
    };
}

scalar_field!(
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    bool,
    char,
    String,
    &'static str,
    Vec<u8>,
    serde_json::Value,
    Uuid,
    DateTime<Utc>,
    NaiveDateTime,
);

impl<T: PatchField + Clone> PatchField for Option<T> {
    const KIND: FieldKind = T::KIND.optional();

    fn field_value(&self) -> FieldValue<'_> {
        match self {
            Some(v) => v.field_value(),
            None => FieldValue::Absent,
        }
    }

    fn load_from(&mut self, source: &Self, field: &FieldDescriptor, loader: &Loader<'_>) {
        if T::KIND.is_record() {
            if !loader.allowed(field) {
                return;
            }
            match (self.as_mut(), source) {
                (Some(current), Some(new)) => current.load_from(new, field, loader),
                (None, Some(new)) => *self = Some(new.clone()),
                // An absent substructure never replaces a present one.
                (_, None) => {}
            }
        } else if loader.overrides(field, &source.field_value()) {
            self.clone_from(source);
        }
    }
}

impl<T: PatchField + ?Sized> PatchField for Box<T> {
    const KIND: FieldKind = T::KIND;

    fn field_value(&self) -> FieldValue<'_> {
        (**self).field_value()
    }

    fn load_from(&mut self, source: &Self, field: &FieldDescriptor, loader: &Loader<'_>) {
        (**self).load_from(&**source, field, loader);
    }
}

/// Shared values are replaced wholesale, never merged in place.
impl<T: PatchField + ?Sized> PatchField for Arc<T> {
    const KIND: FieldKind = T::KIND;

    fn field_value(&self) -> FieldValue<'_> {
        (**self).field_value()
    }

    fn load_from(&mut self, source: &Self, field: &FieldDescriptor, loader: &Loader<'_>) {
        if loader.overrides(field, &source.field_value()) {
            *self = Arc::clone(source);
        }
    }
}

macro_rules! non_storable_field {
    ($(impl<$($g:ident),*> for $t:ty;)*) => {
        $(
            impl<$($g),*> PatchField for $t {
                const KIND: FieldKind = FieldKind::NonStorable;

                fn field_value(&self) -> FieldValue<'_> {
                    FieldValue::NonStorable
                }

                fn load_from(&mut self, _source: &Self, _field: &FieldDescriptor, _loader: &Loader<'_>) {}
            }
        )*
    };
}

non_storable_field! {
    impl<T> for mpsc::Sender<T>;
    impl<T> for mpsc::SyncSender<T>;
    impl<T> for mpsc::Receiver<T>;
    impl<T> for PhantomData<T>;
    impl<R> for fn() -> R;
    impl<A, R> for fn(A) -> R;
    impl<R> for dyn Fn() -> R;
    impl<A, R> for dyn Fn(A) -> R;
    impl<R> for dyn Fn() -> R + Send + Sync;
    impl<A, R> for dyn Fn(A) -> R + Send + Sync;
    impl<R> for dyn FnMut() -> R + Send;
    impl<A, R> for dyn FnMut(A) -> R + Send;
}
