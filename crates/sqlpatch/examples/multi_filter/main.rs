//! Compose WHERE and JOIN clauses from reusable filters.
//!
//! Run with: cargo run --example multi_filter -p sqlpatch

use sqlpatch::{
    Clause, Filter, Join, MultiFilter, PatchError, PatchOptions, Record, SqlPatch, Where, WhereType,
};

#[derive(Debug, Record)]
#[sqlpatch(table = "orders")]
pub struct OrderStatus {
    #[sqlpatch(db = "orders.status")]
    pub status: String,
}

/// Only rows belonging to one tenant.
struct Tenant(i64);

impl Filter for Tenant {
    fn join_clause(&self) -> Option<Clause> {
        Some(Clause::new(
            "JOIN accounts a ON a.id = orders.account_id AND a.tenant_id = ?",
            [self.0],
        ))
    }

    fn where_clause(&self) -> Option<Clause> {
        Some(Clause::raw("a.active"))
    }
}

/// Orders matching any of the given ids.
struct AnyId(Vec<i64>);

impl Filter for AnyId {
    fn compose_into(&self, composer: &mut sqlpatch::Composer) {
        for id in &self.0 {
            composer.push_where(WhereType::Or, Clause::new("orders.id = ?", [*id]));
        }
    }
}

fn main() -> Result<(), PatchError> {
    let update = OrderStatus {
        status: "shipped".into(),
    };

    let scope = MultiFilter::new()
        .with(Tenant(3))
        .with(Join::new("JOIN carriers c ON c.id = orders.carrier_id", Vec::<i64>::new()))
        .with(Where::new("c.name = ?", ["acme"]));

    let opts = PatchOptions::new()
        .filter(scope)
        .filter(AnyId(vec![10, 11]))
        .limit(100);

    let (sql, args) = SqlPatch::new(&update, opts)?.generate_sql()?;
    println!("{sql}");
    println!("args: {args:?}");

    Ok(())
}
