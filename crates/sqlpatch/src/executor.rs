//! Statement execution sink.

use crate::error::PatchResult;
use crate::placeholder::PlaceholderStyle;
use crate::value::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by [`Executor::execute`]: rows affected.
pub type ExecFuture<'a> = Pin<Box<dyn Future<Output = PatchResult<u64>> + Send + 'a>>;

/// Something that can run a generated statement.
///
/// The statement is handed over exactly once; the result or error is passed
/// straight back to the caller. Implemented for `tokio_postgres::Client` and
/// `tokio_postgres::Transaction` with the `postgres` feature.
///
/// ```ignore
/// struct Recorder(std::sync::Mutex<Vec<(String, Vec<Value>)>>);
///
/// impl Executor for Recorder {
///     fn execute<'a>(&'a self, sql: &'a str, args: &'a [Value]) -> ExecFuture<'a> {
///         self.0.lock().unwrap().push((sql.to_string(), args.to_vec()));
///         Box::pin(async { Ok(1) })
///     }
/// }
/// ```
pub trait Executor: Send + Sync {
    /// Execute a statement and return the number of rows affected.
    fn execute<'a>(&'a self, sql: &'a str, args: &'a [Value]) -> ExecFuture<'a>;

    /// Placeholder style this executor expects, used when the options do not
    /// set one.
    fn placeholder_style(&self) -> Option<PlaceholderStyle> {
        None
    }
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute<'a>(&'a self, sql: &'a str, args: &'a [Value]) -> ExecFuture<'a> {
        (**self).execute(sql, args)
    }

    fn placeholder_style(&self) -> Option<PlaceholderStyle> {
        (**self).placeholder_style()
    }
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn execute<'a>(&'a self, sql: &'a str, args: &'a [Value]) -> ExecFuture<'a> {
        (**self).execute(sql, args)
    }

    fn placeholder_style(&self) -> Option<PlaceholderStyle> {
        (**self).placeholder_style()
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn execute<'a>(&'a self, sql: &'a str, args: &'a [Value]) -> ExecFuture<'a> {
        (**self).execute(sql, args)
    }

    fn placeholder_style(&self) -> Option<PlaceholderStyle> {
        (**self).placeholder_style()
    }
}
