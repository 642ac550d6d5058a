//! Insert many records with one statement.
//!
//! Run with: cargo run --example batch_insert -p sqlpatch

use sqlpatch::{InsertBatch, PatchError, PatchOptions, PlaceholderStyle, Record};

#[derive(Debug, Clone, Record)]
#[sqlpatch(table = "users")]
pub struct User {
    #[sqlpatch(db = "id,pk")]
    pub id: i64,
    #[sqlpatch(db = "username")]
    pub username: String,
    #[sqlpatch(db = "email")]
    pub email: Option<String>,
}

fn main() -> Result<(), PatchError> {
    let users = vec![
        User {
            id: 1,
            username: "alice".into(),
            email: Some("alice@example.com".into()),
        },
        User {
            id: 2,
            username: "bob".into(),
            email: None,
        },
    ];

    println!("=== Primary keys left to the database ===");
    let batch = InsertBatch::new(&users, PatchOptions::new())?;
    let (sql, args) = batch.generate_sql()?;
    println!("{sql}");
    println!("args: {args:?}\n");

    println!("=== Explicit primary keys, Postgres placeholders ===");
    let batch = InsertBatch::new(
        &users,
        PatchOptions::new()
            .include_primary_key()
            .placeholder(PlaceholderStyle::Dollar),
    )?;
    let (sql, args) = batch.generate_sql()?;
    println!("{sql}");
    println!("args: {args:?}");

    Ok(())
}
