//! UPDATE statement assembly.

use crate::diff;
use crate::error::{PatchError, PatchResult};
use crate::executor::Executor;
use crate::options::PatchOptions;
use crate::placeholder::{self, PlaceholderStyle};
use crate::record::Record;
use crate::value::Value;
use crate::walk::{ColumnValue, Walker};
use std::fmt::Write as _;

/// A parameterized UPDATE built from a record.
///
/// The column list and the argument list always have the same length; the
/// `n`th argument binds the `n`th `SET` assignment.
///
/// ```ignore
/// let patch = SqlPatch::new(&user, PatchOptions::new()
///     .table("people")
///     .filter(Where::new("id = ?", [user.id])))?;
/// let (sql, args) = patch.generate_sql()?;
/// ```
#[derive(Debug, Clone)]
pub struct SqlPatch {
    columns: Vec<&'static str>,
    args: Vec<Value>,
    table: String,
    opts: PatchOptions,
}

impl SqlPatch {
    /// Walk `record` and keep every included field.
    pub fn new(record: &dyn Record, opts: PatchOptions) -> PatchResult<Self> {
        let walked = Walker::new(&opts).walk(record)?;
        Ok(Self::from_columns(record, walked, opts))
    }

    /// Keep only the fields of `new` that change `old`.
    ///
    /// Fails with [`PatchError::NoChanges`] when the records are equal under
    /// the active zero/nil policy.
    pub fn diff<R: Record>(old: &R, new: &R, opts: PatchOptions) -> PatchResult<Self> {
        Self::diff_dyn(old, new, opts)
    }

    /// [`SqlPatch::diff`] over type-erased records.
    ///
    /// Fails with [`PatchError::InvalidArgument`] when the records are of
    /// different types.
    pub fn diff_dyn(old: &dyn Record, new: &dyn Record, opts: PatchOptions) -> PatchResult<Self> {
        let changed = diff::diff(old, new, &opts)?;
        Ok(Self::from_columns(new, changed, opts))
    }

    fn from_columns(record: &dyn Record, walked: Vec<ColumnValue>, opts: PatchOptions) -> Self {
        let table = opts.resolve_table(record.descriptor().table);
        let (columns, args) = walked.into_iter().unzip();
        Self {
            columns,
            args,
            table,
            opts,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Column names in walk order.
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// `SET` assignments (`col = ?`), or `None` if there are none.
    pub fn fields(&self) -> Option<Vec<String>> {
        if self.columns.is_empty() {
            return None;
        }
        Some(self.columns.iter().map(|c| format!("{c} = ?")).collect())
    }

    /// Arguments of the `SET` assignments, or `None` if there are none.
    pub fn args(&self) -> Option<&[Value]> {
        if self.args.is_empty() {
            return None;
        }
        Some(&self.args)
    }

    fn validate(&self) -> PatchResult<()> {
        if self.table.is_empty() {
            return Err(PatchError::missing("table"));
        }
        if self.columns.is_empty() {
            return Err(PatchError::empty("fields"));
        }
        if self.args.is_empty() {
            return Err(PatchError::empty("args"));
        }
        if !self.opts.filters.has_where() {
            return Err(PatchError::empty("where"));
        }
        Ok(())
    }

    /// Render the statement and its ordered arguments.
    ///
    /// Arguments are ordered join arguments, then column arguments, then
    /// WHERE arguments:
    ///
    /// ```text
    /// UPDATE <table>
    /// [<join>]SET a = ?, b = ?
    /// WHERE (1=1)
    /// AND (
    /// <where>
    /// )
    /// ```
    pub fn generate_sql(&self) -> PatchResult<(String, Vec<Value>)> {
        self.render(self.opts.resolve_placeholder())
    }

    fn render(&self, style: PlaceholderStyle) -> PatchResult<(String, Vec<Value>)> {
        self.validate()?;

        let filters = &self.opts.filters;
        let mut sql = String::with_capacity(64 + self.columns.len() * 16);
        sql.push_str("UPDATE ");
        sql.push_str(&self.table);
        sql.push('\n');
        sql.push_str(&filters.join_sql());
        sql.push_str("SET ");
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(column);
            sql.push_str(" = ?");
        }
        sql.push('\n');
        sql.push_str("WHERE (1=1)\n");
        sql.push_str("AND (\n");
        sql.push_str(&filters.where_body());
        sql.push(')');
        if let Some(limit) = self.opts.limit {
            let _ = write!(sql, "\nLIMIT {limit}");
        }
        if let Some(offset) = self.opts.offset {
            let _ = write!(sql, "\nOFFSET {offset}");
        }

        let mut args = filters.join_args();
        args.extend(self.args.iter().cloned());
        args.extend(filters.where_args());

        check_alignment(&sql, &args);
        let sql = style.render(&sql);
        log_sql(&self.opts, "update", &self.table, self.columns.len(), &sql, args.len());
        Ok((sql, args))
    }

    /// Execute with the executor set in the options.
    pub async fn perform(&self) -> PatchResult<u64> {
        let executor = self
            .opts
            .executor
            .clone()
            .ok_or(PatchError::missing("executor"))?;
        self.perform_with(executor.as_ref()).await
    }

    /// Execute with `executor`, e.g. an open transaction.
    ///
    /// Placeholders follow the options if set, otherwise the executor.
    pub async fn perform_with(&self, executor: &dyn Executor) -> PatchResult<u64> {
        let style = self
            .opts
            .placeholder
            .or_else(|| executor.placeholder_style())
            .unwrap_or_default();
        let (sql, args) = self.render(style)?;
        executor.execute(&sql, &args).await
    }
}

/// Build an UPDATE from `record` and render it.
pub fn generate_sql(record: &dyn Record, opts: PatchOptions) -> PatchResult<(String, Vec<Value>)> {
    SqlPatch::new(record, opts)?.generate_sql()
}

/// Build an UPDATE from `record` and execute it with the configured executor.
pub async fn perform_patch(record: &dyn Record, opts: PatchOptions) -> PatchResult<u64> {
    SqlPatch::new(record, opts)?.perform().await
}

/// Build a minimal UPDATE from `old`/`new` and execute it.
///
/// Fails with [`PatchError::NoChanges`] when nothing differs; wrap in
/// [`crate::ignore_no_changes`] if that is acceptable.
pub async fn perform_diff_patch<R: Record>(old: &R, new: &R, opts: PatchOptions) -> PatchResult<u64> {
    SqlPatch::diff(old, new, opts)?.perform().await
}

/// Placeholder count and argument count should agree; a mismatch means a
/// filter supplied the wrong number of arguments.
pub(crate) fn check_alignment(sql: &str, args: &[Value]) {
    let placeholders = placeholder::count_placeholders(sql);
    if placeholders != args.len() {
        tracing::warn!(
            target: "sqlpatch.sql",
            placeholders,
            args = args.len(),
            "placeholder count does not match argument count"
        );
    }
}

pub(crate) fn log_sql(
    opts: &PatchOptions,
    statement: &'static str,
    table: &str,
    column_count: usize,
    sql: &str,
    param_count: usize,
) {
    let sql = truncate_sql(sql, opts.max_log_sql_length);
    tracing::debug!(
        target: "sqlpatch.sql",
        statement,
        table,
        column_count,
        param_count,
        sql = %sql,
    );
}

fn truncate_sql(sql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if sql.len() > max => {
            let mut end = max;
            while end > 0 && !sql.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &sql[..end])
        }
        _ => sql.to_string(),
    }
}
