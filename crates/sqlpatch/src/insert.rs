//! Multi-row INSERT statements.

use crate::error::{PatchError, PatchResult};
use crate::executor::Executor;
use crate::options::PatchOptions;
use crate::patch::{check_alignment, log_sql};
use crate::placeholder::PlaceholderStyle;
use crate::record::Record;
use crate::value::Value;
use crate::walk::Walker;

/// A parameterized multi-row INSERT.
///
/// Every storable field that is visible and not skipped or ignored becomes a
/// column; zero and absent values are inserted as they are. Primary key
/// fields (`pk` directive) are left out unless
/// [`PatchOptions::include_primary_key`] is set.
///
/// ```ignore
/// let batch = InsertBatch::new(&users, PatchOptions::new().table("users"))?;
/// let (sql, args) = batch.generate_sql()?;
/// // INSERT INTO users (name, email) VALUES (?, ?), (?, ?)
/// ```
#[derive(Debug, Clone)]
pub struct InsertBatch {
    columns: Vec<&'static str>,
    args: Vec<Value>,
    rows: usize,
    table: String,
    opts: PatchOptions,
}

impl InsertBatch {
    /// Walk every record in order.
    ///
    /// All records must produce the same columns; a record whose optional
    /// substructure is absent while another's is present is rejected with
    /// [`PatchError::InvalidArgument`].
    pub fn new<R: Record>(records: &[R], opts: PatchOptions) -> PatchResult<Self> {
        let walker = Walker::for_insert(&opts);
        let mut columns: Vec<&'static str> = Vec::new();
        let mut args = Vec::new();

        for (row, record) in records.iter().enumerate() {
            let walked = walker.walk(record)?;
            let row_columns: Vec<&'static str> = walked.iter().map(|(c, _)| *c).collect();
            if row == 0 {
                columns = dedup(&row_columns);
            } else if dedup(&row_columns) != columns {
                return Err(PatchError::invalid(format!(
                    "record {row} produces columns ({}) but record 0 produces ({})",
                    row_columns.join(", "),
                    columns.join(", ")
                )));
            }
            args.extend(first_seen(walked));
        }

        let table = opts.resolve_table(records.first().and_then(|r| r.descriptor().table));
        Ok(Self {
            columns,
            args,
            rows: records.len(),
            table,
            opts,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Column names, deduplicated in first-seen order, or `None` if empty.
    pub fn fields(&self) -> Option<&[&'static str]> {
        if self.columns.is_empty() {
            return None;
        }
        Some(&self.columns)
    }

    /// Row-major arguments, or `None` if empty.
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
        Ok(())
    }

    /// Render `INSERT INTO <table> (<cols>) VALUES (?, ?), (?, ?)`.
    pub fn generate_sql(&self) -> PatchResult<(String, Vec<Value>)> {
        self.render(self.opts.resolve_placeholder())
    }

    fn render(&self, style: PlaceholderStyle) -> PatchResult<(String, Vec<Value>)> {
        self.validate()?;

        let row = format!("({})", vec!["?"; self.columns.len()].join(", "));
        let mut sql = String::with_capacity(32 + self.rows * (row.len() + 2));
        sql.push_str("INSERT INTO ");
        sql.push_str(&self.table);
        sql.push_str(" (");
        sql.push_str(&self.columns.join(", "));
        sql.push_str(") VALUES ");
        for i in 0..self.rows {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&row);
        }

        check_alignment(&sql, &self.args);
        let sql = style.render(&sql);
        log_sql(&self.opts, "insert", &self.table, self.columns.len(), &sql, self.args.len());
        Ok((sql, self.args.clone()))
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

    /// Execute with `executor`.
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

fn dedup(columns: &[&'static str]) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::with_capacity(columns.len());
    for column in columns {
        if !out.contains(column) {
            out.push(*column);
        }
    }
    out
}

/// Values of the first occurrence of each column.
fn first_seen(walked: Vec<(&'static str, Value)>) -> Vec<Value> {
    let mut seen: Vec<&'static str> = Vec::with_capacity(walked.len());
    let mut out = Vec::with_capacity(walked.len());
    for (column, value) in walked {
        if seen.contains(&column) {
            tracing::trace!(target: "sqlpatch.walk", column, "duplicate column dropped");
            continue;
        }
        seen.push(column);
        out.push(value);
    }
    out
}
