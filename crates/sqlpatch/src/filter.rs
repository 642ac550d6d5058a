//! WHERE/JOIN filters.
//!
//! A filter is anything that can contribute a WHERE clause, a JOIN clause, or
//! both. Both capabilities are optional trait methods, so a filter type only
//! implements what it supplies:
//!
//! ```ignore
//! struct ById(i64);
//!
//! impl Filter for ById {
//!     fn where_clause(&self) -> Option<Clause> {
//!         Some(Clause::new("id = ?", [self.0]))
//!     }
//! }
//! ```

use crate::composer::Composer;
use crate::value::Value;

/// Build a `Vec<Value>` from heterogeneous arguments.
///
/// ```ignore
/// let args = sqlpatch::args![1, "john", None::<i32>];
/// ```
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<$crate::Value>::new() };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}

/// Combinator joining a WHERE clause to the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WhereType {
    #[default]
    And,
    Or,
}

impl WhereType {
    /// SQL keyword of this combinator.
    pub fn keyword(self) -> &'static str {
        match self {
            WhereType::And => "AND",
            WhereType::Or => "OR",
        }
    }

    /// Parse a combinator keyword (case-insensitive). Returns `None` if invalid.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("AND") {
            Some(WhereType::And)
        } else if s.eq_ignore_ascii_case("OR") {
            Some(WhereType::Or)
        } else {
            None
        }
    }
}

/// Invalid keywords fall back to `AND`.
impl From<&str> for WhereType {
    fn from(s: &str) -> Self {
        WhereType::parse(s).unwrap_or_default()
    }
}

/// One unit of SQL text plus its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Clause {
    pub fn new<I, V>(sql: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            sql: sql.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// A clause without arguments.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }
}

/// A source of WHERE and/or JOIN clauses.
pub trait Filter {
    /// WHERE clause supplied by this filter.
    fn where_clause(&self) -> Option<Clause> {
        None
    }

    /// Combinator for [`Filter::where_clause`].
    fn where_type(&self) -> WhereType {
        WhereType::And
    }

    /// JOIN clause supplied by this filter.
    fn join_clause(&self) -> Option<Clause> {
        None
    }

    /// Append this filter's clauses to a composer.
    ///
    /// Composite filters override this to splice their own fragments in with
    /// their individual combinators.
    fn compose_into(&self, composer: &mut Composer) {
        if let Some(join) = self.join_clause() {
            composer.push_join(join);
        }
        if let Some(clause) = self.where_clause() {
            composer.push_where(self.where_type(), clause);
        }
    }
}

impl<F: Filter + ?Sized> Filter for &F {
    fn where_clause(&self) -> Option<Clause> {
        (**self).where_clause()
    }

    fn where_type(&self) -> WhereType {
        (**self).where_type()
    }

    fn join_clause(&self) -> Option<Clause> {
        (**self).join_clause()
    }

    fn compose_into(&self, composer: &mut Composer) {
        (**self).compose_into(composer);
    }
}

impl<F: Filter + ?Sized> Filter for Box<F> {
    fn where_clause(&self) -> Option<Clause> {
        (**self).where_clause()
    }

    fn where_type(&self) -> WhereType {
        (**self).where_type()
    }

    fn join_clause(&self) -> Option<Clause> {
        (**self).join_clause()
    }

    fn compose_into(&self, composer: &mut Composer) {
        (**self).compose_into(composer);
    }
}

/// `None` contributes nothing.
impl<F: Filter> Filter for Option<F> {
    fn where_clause(&self) -> Option<Clause> {
        self.as_ref().and_then(Filter::where_clause)
    }

    fn where_type(&self) -> WhereType {
        self.as_ref().map(Filter::where_type).unwrap_or_default()
    }

    fn join_clause(&self) -> Option<Clause> {
        self.as_ref().and_then(Filter::join_clause)
    }

    fn compose_into(&self, composer: &mut Composer) {
        if let Some(filter) = self {
            filter.compose_into(composer);
        }
    }
}

/// A plain WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Where {
    clause: Clause,
    where_type: WhereType,
}

impl Where {
    /// An `AND` clause.
    pub fn new<I, V>(sql: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            clause: Clause::new(sql, args),
            where_type: WhereType::And,
        }
    }

    /// An `OR` clause.
    pub fn or<I, V>(sql: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(sql, args).with_type(WhereType::Or)
    }

    /// Override the combinator. Accepts a keyword; invalid keywords mean `AND`.
    pub fn with_type(mut self, where_type: impl Into<WhereType>) -> Self {
        self.where_type = where_type.into();
        self
    }
}

impl Filter for Where {
    fn where_clause(&self) -> Option<Clause> {
        Some(self.clause.clone())
    }

    fn where_type(&self) -> WhereType {
        self.where_type
    }
}

/// A plain JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    clause: Clause,
}

impl Join {
    pub fn new<I, V>(sql: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            clause: Clause::new(sql, args),
        }
    }
}

impl Filter for Join {
    fn join_clause(&self) -> Option<Clause> {
        Some(self.clause.clone())
    }
}

/// A filter made of other filters.
///
/// Composing a `MultiFilter` yields exactly the fragments of the filters it
/// holds, so multi-filters nest freely.
#[derive(Debug, Clone, Default)]
pub struct MultiFilter {
    composer: Composer,
}

impl MultiFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter.
    pub fn add(&mut self, filter: impl Filter) -> &mut Self {
        self.composer.add(&filter);
        self
    }

    /// Add a filter (consuming version).
    pub fn with(mut self, filter: impl Filter) -> Self {
        self.composer.add(&filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.composer.is_empty()
    }
}

impl Filter for MultiFilter {
    /// Accumulated WHERE text, each fragment prefixed by its combinator.
    fn where_clause(&self) -> Option<Clause> {
        self.composer.has_where().then(|| Clause {
            sql: self.composer.where_sql(),
            args: self.composer.where_args(),
        })
    }

    fn join_clause(&self) -> Option<Clause> {
        self.composer.has_join().then(|| Clause {
            sql: self.composer.join_sql(),
            args: self.composer.join_args(),
        })
    }

    fn compose_into(&self, composer: &mut Composer) {
        composer.extend(&self.composer);
    }
}
