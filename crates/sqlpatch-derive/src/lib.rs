//! Derive macros for sqlpatch
//!
//! Provides `#[derive(Record)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record;

/// Derive `Record` (and `PatchField`, so the type nests) for a struct.
///
/// # Example
///
/// ```ignore
/// use sqlpatch::Record;
///
/// #[derive(Record)]
/// #[sqlpatch(table = "users")]
/// pub struct User {
///     #[sqlpatch(db = "id", pk)]
///     pub id: i64,
///     #[sqlpatch(db = "user_name")]
///     pub name: Option<String>,
///     #[sqlpatch(embed)]
///     pub audit: Audit,
/// }
/// ```
///
/// # Attributes
///
/// - `#[sqlpatch(table = "name")]` - Default table for statements
/// - `#[sqlpatch(<tag> = "value")]` - Raw tag string, e.g. `db = "col,pk"`
/// - `#[sqlpatch(skip)]`, `omitempty`, `allow_zero`, `allow_nil`, `pk` - Field directives
/// - `#[sqlpatch(embed)]` - Flatten an embedded record (`flatten` is accepted too)
///
/// Only `pub` fields take part in statements.
#[proc_macro_derive(Record, attributes(sqlpatch))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
