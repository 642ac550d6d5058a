//! Minimal patches: diff two versions of a record and only SET what changed.
//!
//! Run with: cargo run --example diff_patch -p sqlpatch

use sqlpatch::{PatchError, PatchOptions, Record, SqlPatch, Where, ignore_no_changes, load_diff};

#[derive(Debug, Clone, Record)]
pub struct Address {
    #[sqlpatch(db = "street")]
    pub street: String,
    #[sqlpatch(db = "city")]
    pub city: String,
}

#[derive(Debug, Clone, Record)]
#[sqlpatch(table = "customers")]
pub struct Customer {
    #[sqlpatch(db = "id", skip)]
    pub id: i64,
    #[sqlpatch(db = "name")]
    pub name: String,
    #[sqlpatch(db = "email")]
    pub email: Option<String>,
    pub address: Option<Address>,
}

fn main() -> Result<(), PatchError> {
    let old = Customer {
        id: 7,
        name: "John".into(),
        email: Some("john@example.com".into()),
        address: Some(Address {
            street: "1 Main St".into(),
            city: "Springfield".into(),
        }),
    };

    let mut new = old.clone();
    new.email = None;
    if let Some(address) = new.address.as_mut() {
        address.city = "Shelbyville".into();
    }

    let opts = || PatchOptions::new().filter(Where::new("id = ?", [old.id]));

    println!("=== Changed fields only ===");
    let (sql, args) = SqlPatch::diff(&old, &new, opts())?.generate_sql()?;
    println!("{sql}");
    println!("args: {args:?}\n");

    println!("=== Clearing a value needs include_nil_values ===");
    let (sql, args) = SqlPatch::diff(&old, &new, opts().include_nil_values())?.generate_sql()?;
    println!("{sql}");
    println!("args: {args:?}\n");

    println!("=== Nothing changed ===");
    match ignore_no_changes(SqlPatch::diff(&old, &old, opts()))? {
        Some(patch) => println!("unexpected patch: {:?}", patch.columns()),
        None => println!("no statement needed\n"),
    }

    println!("=== Merging the changes into the old record ===");
    let mut merged = old.clone();
    load_diff(&mut merged, &new, &PatchOptions::new());
    println!("{merged:#?}");

    Ok(())
}
