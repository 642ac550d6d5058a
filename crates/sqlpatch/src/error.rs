//! Error types for sqlpatch

use thiserror::Error;

/// Result type alias for sqlpatch operations
pub type PatchResult<T> = Result<T, PatchError>;

/// Error types for statement generation and execution
#[derive(Debug, Error)]
pub enum PatchError {
    /// Input was not usable as a record (e.g. mismatched record types in a diff)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required setting is missing (table name, executor)
    #[error("Missing configuration: {0}")]
    MissingConfiguration(&'static str),

    /// Nothing to render: no fields, no arguments or no WHERE clause
    #[error("Empty result: {0}")]
    EmptyResult(&'static str),

    /// The old and new records are equal under the active policy
    #[error("no changes detected between the old and new records")]
    NoChanges,

    /// A field kind that cannot be bound as a parameter (strict mode only)
    #[error("Unsupported field kind for field '{field}'")]
    UnsupportedFieldKind { field: String },

    /// Value serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Statement execution error, passed through from the executor
    #[cfg(feature = "postgres")]
    #[error("Execution error: {0}")]
    Execution(#[from] tokio_postgres::Error),

    /// Statement execution error from a non-postgres executor
    #[error("Execution error: {0}")]
    Executor(String),
}

impl PatchError {
    /// Create an invalid argument error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a missing configuration error
    pub fn missing(what: &'static str) -> Self {
        Self::MissingConfiguration(what)
    }

    /// Create an empty result error
    pub fn empty(what: &'static str) -> Self {
        Self::EmptyResult(what)
    }

    /// Create an unsupported field kind error
    pub fn unsupported(field: impl Into<String>) -> Self {
        Self::UnsupportedFieldKind {
            field: field.into(),
        }
    }

    /// Create an executor error from any displayable driver error
    pub fn executor(message: impl std::fmt::Display) -> Self {
        Self::Executor(message.to_string())
    }

    /// Check if this is the "no changes" outcome of a diff
    pub fn is_no_changes(&self) -> bool {
        matches!(self, Self::NoChanges)
    }

    /// Check if this is a missing configuration error
    pub fn is_missing_configuration(&self) -> bool {
        matches!(self, Self::MissingConfiguration(_))
    }

    /// Check if this is an empty result error
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult(_))
    }
}

/// Treat [`PatchError::NoChanges`] as success.
///
/// Any other error is passed through unchanged. Useful when "nothing to patch"
/// is an acceptable outcome of a diff:
///
/// ```ignore
/// let patch = sqlpatch::ignore_no_changes(SqlPatch::diff(&old, &new, opts))?;
/// if let Some(patch) = patch {
///     patch.perform().await?;
/// }
/// ```
pub fn ignore_no_changes<T>(result: PatchResult<T>) -> PatchResult<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(PatchError::NoChanges) => Ok(None),
        Err(e) => Err(e),
    }
}
