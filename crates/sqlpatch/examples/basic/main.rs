//! Generate an UPDATE statement from a record.
//!
//! Run with: cargo run --example basic -p sqlpatch

use sqlpatch::{PatchError, PatchOptions, PlaceholderStyle, Record, SqlPatch, Where};

#[derive(Debug, Record)]
#[sqlpatch(table = "people")]
pub struct Person {
    #[sqlpatch(db = "id", skip)]
    pub id: i64,
    #[sqlpatch(db = "name")]
    pub name: Option<String>,
    #[sqlpatch(db = "age")]
    pub age: i32,
    #[sqlpatch(db = "nickname", omitempty)]
    pub nickname: String,
}

fn main() -> Result<(), PatchError> {
    let person = Person {
        id: 1,
        name: Some("john".into()),
        age: 0,
        nickname: String::new(),
    };

    // ============================================
    // Zero values are left out by default
    // ============================================
    println!("=== Default policy ===");
    let patch = SqlPatch::new(&person, PatchOptions::new().filter(Where::new("id = ?", [person.id])))?;
    let (sql, args) = patch.generate_sql()?;
    println!("{sql}");
    println!("args: {args:?}\n");

    // ============================================
    // Include zero values for the whole call
    // ============================================
    println!("=== include_zero_values ===");
    let (sql, args) = SqlPatch::new(
        &person,
        PatchOptions::new()
            .filter(Where::new("id = ?", [person.id]))
            .include_zero_values()
            .placeholder(PlaceholderStyle::Dollar),
    )?
    .generate_sql()?;
    println!("{sql}");
    println!("args: {args:?}\n");

    // ============================================
    // A WHERE clause is mandatory
    // ============================================
    println!("=== Missing WHERE ===");
    match SqlPatch::new(&person, PatchOptions::new())?.generate_sql() {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("error: {e}"),
    }

    Ok(())
}
