//! Call-level configuration.

use crate::composer::Composer;
use crate::executor::Executor;
use crate::filter::Filter;
use crate::placeholder::PlaceholderStyle;
use crate::record::FieldDescriptor;
use crate::tag::DEFAULT_DB_TAG;
use std::fmt;
use std::sync::Arc;

/// Predicate deciding whether a field is ignored. Returns `true` to ignore.
pub type IgnoreFieldsFn = Arc<dyn Fn(&FieldDescriptor) -> bool + Send + Sync>;

/// Options for a single patch or insert generation.
///
/// Options are consumed by one generation call; nothing is cached across calls.
///
/// ```ignore
/// let opts = PatchOptions::new()
///     .table("people")
///     .filter(Where::new("id = ?", [1]))
///     .include_zero_values();
/// ```
#[derive(Clone)]
pub struct PatchOptions {
    /// Tag naming the storage column (default `db`).
    pub tag_name: String,
    /// Target table; overrides the record's `#[sqlpatch(table = "...")]`.
    pub table: Option<String>,
    /// Include zero values of required fields.
    pub include_zero_values: bool,
    /// Include absent optional fields as NULL.
    pub include_nil_values: bool,
    /// Field names to ignore, stored lowercased.
    pub ignored_fields: Vec<String>,
    /// Predicate ignoring fields.
    pub ignore_fields_fn: Option<IgnoreFieldsFn>,
    /// Error on non-storable fields instead of skipping them.
    pub strict: bool,
    /// Include primary key fields in inserts.
    pub include_primary_key: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Placeholder style; `None` defers to the executor, then to `?`.
    pub placeholder: Option<PlaceholderStyle>,
    /// Truncate SQL in log events (in bytes). `None` means no truncation.
    pub max_log_sql_length: Option<usize>,
    pub(crate) filters: Composer,
    pub(crate) executor: Option<Arc<dyn Executor>>,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            tag_name: DEFAULT_DB_TAG.to_string(),
            table: None,
            include_zero_values: false,
            include_nil_values: false,
            ignored_fields: Vec::new(),
            ignore_fields_fn: None,
            strict: false,
            include_primary_key: false,
            limit: None,
            offset: None,
            placeholder: None,
            max_log_sql_length: Some(200),
            filters: Composer::new(),
            executor: None,
        }
    }
}

impl fmt::Debug for PatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchOptions")
            .field("tag_name", &self.tag_name)
            .field("table", &self.table)
            .field("include_zero_values", &self.include_zero_values)
            .field("include_nil_values", &self.include_nil_values)
            .field("ignored_fields", &self.ignored_fields)
            .field("ignore_fields_fn", &self.ignore_fields_fn.is_some())
            .field("strict", &self.strict)
            .field("include_primary_key", &self.include_primary_key)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("placeholder", &self.placeholder)
            .field("filters", &self.filters)
            .field("executor", &self.executor.is_some())
            .finish()
    }
}

impl PatchOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read column names from another tag (default `db`).
    pub fn tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    /// Set the target table.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Include fields holding the zero value of their type.
    pub fn include_zero_values(mut self) -> Self {
        self.include_zero_values = true;
        self
    }

    /// Include absent optional fields, bound as NULL.
    pub fn include_nil_values(mut self) -> Self {
        self.include_nil_values = true;
        self
    }

    /// Ignore fields by Rust field name (case-insensitive).
    pub fn ignored_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_fields
            .extend(fields.into_iter().map(|f| f.as_ref().to_lowercase()));
        self
    }

    /// Ignore every field for which `f` returns `true`.
    pub fn ignore_fields_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldDescriptor) -> bool + Send + Sync + 'static,
    {
        self.ignore_fields_fn = Some(Arc::new(f));
        self
    }

    /// Fail with `UnsupportedFieldKind` on non-storable fields.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Keep primary key fields in batch inserts.
    pub fn include_primary_key(mut self) -> Self {
        self.include_primary_key = true;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the placeholder style explicitly.
    pub fn placeholder(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder = Some(style);
        self
    }

    /// Set maximum SQL length in log events.
    pub fn max_log_sql_length(mut self, len: usize) -> Self {
        self.max_log_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in log events.
    pub fn no_log_truncate(mut self) -> Self {
        self.max_log_sql_length = None;
        self
    }

    /// Add a filter contributing WHERE and/or JOIN clauses.
    pub fn filter(mut self, filter: impl Filter) -> Self {
        self.filters.add(&filter);
        self
    }

    /// Set the executor used by `perform`.
    pub fn executor(mut self, executor: impl Executor + 'static) -> Self {
        self.executor = Some(Arc::new(executor));
        self
    }

    /// Set a shared executor used by `perform`.
    pub fn shared_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Resolve the effective table for a record type.
    pub(crate) fn resolve_table(&self, record_default: Option<&'static str>) -> String {
        self.table
            .clone()
            .or_else(|| record_default.map(str::to_string))
            .unwrap_or_default()
    }

    /// Resolve the placeholder style, preferring an explicit setting.
    pub(crate) fn resolve_placeholder(&self) -> PlaceholderStyle {
        self.placeholder
            .or_else(|| self.executor.as_ref().and_then(|e| e.placeholder_style()))
            .unwrap_or_default()
    }
}
