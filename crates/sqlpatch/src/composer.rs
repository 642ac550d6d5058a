//! WHERE/JOIN fragment accumulation.

use crate::filter::{Clause, Filter, WhereType};
use crate::value::Value;

/// Ordered WHERE and JOIN accumulators.
///
/// Every fragment is whitespace-trimmed and rendered on its own line; WHERE
/// fragments are prefixed by their combinator. Argument order always matches
/// the textual order of the fragments.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    wheres: Vec<(WhereType, Clause)>,
    joins: Vec<Clause>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a filter.
    pub fn add<F: Filter + ?Sized>(&mut self, filter: &F) -> &mut Self {
        filter.compose_into(self);
        self
    }

    /// Append a WHERE fragment. Blank fragments are dropped.
    pub fn push_where(&mut self, where_type: WhereType, clause: Clause) -> &mut Self {
        if let Some(clause) = normalize(clause) {
            self.wheres.push((where_type, clause));
        }
        self
    }

    /// Append a JOIN fragment. Blank fragments are dropped.
    pub fn push_join(&mut self, clause: Clause) -> &mut Self {
        if let Some(clause) = normalize(clause) {
            self.joins.push(clause);
        }
        self
    }

    /// Append all fragments of another composer, keeping their combinators.
    pub fn extend(&mut self, other: &Composer) -> &mut Self {
        self.wheres.extend(other.wheres.iter().cloned());
        self.joins.extend(other.joins.iter().cloned());
        self
    }

    pub fn has_where(&self) -> bool {
        !self.wheres.is_empty()
    }

    pub fn has_join(&self) -> bool {
        !self.joins.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.wheres.is_empty() && self.joins.is_empty()
    }

    /// WHERE text: `"AND a = ?\nOR b = ?\n"`.
    pub fn where_sql(&self) -> String {
        let mut out = String::new();
        for (where_type, clause) in &self.wheres {
            out.push_str(where_type.keyword());
            out.push(' ');
            out.push_str(&clause.sql);
            out.push('\n');
        }
        out
    }

    /// WHERE text without the combinator of the first fragment.
    pub fn where_body(&self) -> String {
        let mut out = String::new();
        for (i, (where_type, clause)) in self.wheres.iter().enumerate() {
            if i > 0 {
                out.push_str(where_type.keyword());
                out.push(' ');
            }
            out.push_str(&clause.sql);
            out.push('\n');
        }
        out
    }

    pub fn where_args(&self) -> Vec<Value> {
        self.wheres
            .iter()
            .flat_map(|(_, clause)| clause.args.iter().cloned())
            .collect()
    }

    /// JOIN text: one fragment per line.
    pub fn join_sql(&self) -> String {
        let mut out = String::new();
        for clause in &self.joins {
            out.push_str(&clause.sql);
            out.push('\n');
        }
        out
    }

    pub fn join_args(&self) -> Vec<Value> {
        self.joins
            .iter()
            .flat_map(|clause| clause.args.iter().cloned())
            .collect()
    }
}

fn normalize(clause: Clause) -> Option<Clause> {
    let sql = clause.sql.trim();
    if sql.is_empty() && clause.args.is_empty() {
        tracing::trace!(target: "sqlpatch.filter", "dropping blank fragment");
        return None;
    }
    Some(Clause {
        sql: sql.to_string(),
        args: clause.args,
    })
}
