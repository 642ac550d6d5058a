//! # sqlpatch
//!
//! Generate parameterized `UPDATE` (and batch `INSERT`) statements from plain
//! Rust structs.
//!
//! ## Features
//!
//! - **Record walking**: `#[derive(Record)]` emits a static field table; nested
//!   and embedded records flatten into one column list
//! - **Inclusion policy**: zero and absent values are left out unless asked
//!   for, per call or per field (`allow_zero`, `allow_nil`, `omitempty`)
//! - **Minimal patches**: diff an old and a new record and only `SET` what changed
//! - **Filters**: WHERE/JOIN fragments with AND/OR combinators, nestable
//!   through [`MultiFilter`]
//! - **Execution**: hand the statement to any [`Executor`]; tokio-postgres
//!   clients and transactions work out of the box
//!
//! ## Example
//!
//! ```ignore
//! use sqlpatch::{PatchOptions, Record, SqlPatch, Where};
//!
//! #[derive(Record)]
//! #[sqlpatch(table = "people")]
//! pub struct Person {
//!     #[sqlpatch(db = "id", skip)]
//!     pub id: i64,
//!     #[sqlpatch(db = "name")]
//!     pub name: Option<String>,
//!     #[sqlpatch(db = "age")]
//!     pub age: i32,
//! }
//!
//! let person = Person { id: 1, name: Some("john".into()), age: 0 };
//! let (sql, args) = SqlPatch::new(&person, PatchOptions::new()
//!     .filter(Where::new("id = ?", [person.id])))?
//!     .generate_sql()?;
//!
//! // UPDATE people
//! // SET name = ?
//! // WHERE (1=1)
//! // AND (
//! // id = ?
//! // )
//! ```

pub mod classify;
pub mod composer;
pub mod diff;
pub mod error;
pub mod executor;
pub mod filter;
pub mod insert;
pub mod load;
pub mod options;
pub mod patch;
pub mod placeholder;
pub mod record;
pub mod tag;
pub mod value;
pub mod walk;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use classify::{Classifier, Exclusion};
pub use composer::Composer;
pub use error::{PatchError, PatchResult, ignore_no_changes};
pub use executor::{ExecFuture, Executor};
pub use filter::{Clause, Filter, Join, MultiFilter, Where, WhereType};
pub use insert::InsertBatch;
pub use load::{Loader, load_diff};
pub use options::{IgnoreFieldsFn, PatchOptions};
pub use patch::{SqlPatch, generate_sql, perform_diff_patch, perform_patch};
pub use placeholder::PlaceholderStyle;
pub use record::{FieldDescriptor, FieldKind, FieldValue, PatchField, Record, RecordDescriptor};
pub use tag::TagPolicy;
pub use value::Value;
pub use walk::{ColumnValue, Walker};

#[cfg(feature = "derive")]
pub use sqlpatch_derive::Record;

#[cfg(feature = "postgres")]
pub use tokio_postgres;
