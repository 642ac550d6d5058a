//! Field directive parsing.
//!
//! A field carries raw tag strings, keyed by tag name:
//!
//! ```ignore
//! #[derive(Record)]
//! pub struct User {
//!     #[sqlpatch(db = "id,pk")]
//!     pub id: i64,
//!     #[sqlpatch(db = "name", patch = "omitempty")]
//!     pub name: Option<String>,
//! }
//! ```
//!
//! The storage tag (`db` by default) names the column in its first token; any
//! further tokens, and all tokens of the directive tag (`patch`), are
//! directives resolved by [`TagPolicy::resolve`].

/// Default storage tag name.
pub const DEFAULT_DB_TAG: &str = "db";

/// Tag holding field directives.
pub const DIRECTIVE_TAG: &str = "patch";

/// Separator between tokens in a tag string.
pub const TAG_SEPARATOR: char = ',';

/// Resolved field directives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagPolicy {
    pub skip: bool,
    pub allow_zero: bool,
    pub allow_nil: bool,
    pub primary_key: bool,
}

impl TagPolicy {
    /// Parse a raw directive string.
    ///
    /// Unknown tokens are ignored, so empty or malformed input yields an
    /// empty policy.
    pub fn resolve(raw: &str) -> Self {
        let mut policy = TagPolicy::default();
        policy.apply_tokens(raw.split(TAG_SEPARATOR));
        policy
    }

    fn apply_tokens<'a>(&mut self, tokens: impl Iterator<Item = &'a str>) {
        for token in tokens {
            match token.trim().to_ascii_lowercase().as_str() {
                "skip" | "-" => self.skip = true,
                "allow_zero" | "allowzero" => self.allow_zero = true,
                "allow_nil" | "allownil" => self.allow_nil = true,
                "omitempty" => {
                    self.allow_zero = true;
                    self.allow_nil = true;
                }
                "pk" | "primary_key" => self.primary_key = true,
                _ => {}
            }
        }
    }

    /// Resolve the effective policy of a field from its storage tag and its
    /// directive tag.
    ///
    /// The first token of the storage tag is the column name and is not a
    /// directive.
    pub fn for_field(storage_tag: Option<&str>, directive_tag: Option<&str>) -> Self {
        let mut policy = directive_tag.map(TagPolicy::resolve).unwrap_or_default();
        if let Some(raw) = storage_tag {
            policy.apply_tokens(raw.split(TAG_SEPARATOR).skip(1));
        }
        policy
    }

    pub fn is_empty(&self) -> bool {
        *self == TagPolicy::default()
    }
}

/// Column name declared by a storage tag (its first token), if any.
pub fn column_name(storage_tag: &str) -> Option<&str> {
    let first = storage_tag.split(TAG_SEPARATOR).next()?.trim();
    (!first.is_empty() && first != "-").then_some(first)
}
