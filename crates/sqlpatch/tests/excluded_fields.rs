#![allow(dead_code)]

use sqlpatch::{InsertBatch, PatchError, PatchOptions, Record, SqlPatch, Where, args, load_diff};
use std::collections::HashMap;
use std::sync::Arc;

/// Carries fields no statement can hold: skipped collections, a private
/// callback and public closures.
#[derive(Record)]
#[sqlpatch(table = "widgets")]
pub struct Widget {
    #[sqlpatch(db = "name")]
    pub name: String,
    #[sqlpatch(skip)]
    pub tags: Vec<String>,
    #[sqlpatch(patch = "skip")]
    pub labels: HashMap<String, String>,
    on_change: Option<Box<dyn Fn() + Send + Sync>>,
    pub hook: Option<Arc<dyn Fn(i64) -> bool + Send + Sync>>,
    pub notifier: Box<dyn Fn() + Send + Sync>,
    #[sqlpatch(db = "version")]
    pub version: i32,
}

fn widget(name: &str, version: i32) -> Widget {
    Widget {
        name: name.into(),
        tags: vec!["a".into()],
        labels: HashMap::from([("k".to_string(), "v".to_string())]),
        on_change: Some(Box::new(|| {})),
        hook: Some(Arc::new(|v| v > 0)),
        notifier: Box::new(|| {}),
        version,
    }
}

fn by_id() -> PatchOptions {
    PatchOptions::new().filter(Where::new("id = ?", [1]))
}

#[test]
fn excluded_fields_never_reach_the_statement() {
    let (sql, args) = SqlPatch::new(&widget("gear", 2), by_id().include_nil_values())
        .unwrap()
        .generate_sql()
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE widgets\nSET name = ?, version = ?\nWHERE (1=1)\nAND (\nid = ?\n)"
    );
    assert_eq!(args, args!["gear", 2, 1]);
}

#[test]
fn strict_mode_reports_only_public_closures() {
    let err = SqlPatch::new(&widget("gear", 2), by_id().strict()).unwrap_err();
    assert!(matches!(err, PatchError::UnsupportedFieldKind { ref field } if field == "hook"));

    // skipped and private fields are never reported
    let patch = SqlPatch::new(
        &widget("gear", 2),
        by_id().strict().ignored_fields(["hook", "notifier"]),
    )
    .unwrap();
    assert_eq!(patch.columns(), &["name", "version"]);
}

#[test]
fn diff_ignores_excluded_fields() {
    let old = widget("gear", 2);
    let mut new = widget("gear", 3);
    new.tags.push("b".into());
    new.hook = None;

    let patch = SqlPatch::diff(&old, &new, by_id().include_nil_values()).unwrap();
    assert_eq!(patch.columns(), &["version"]);
}

#[test]
fn load_diff_leaves_excluded_fields_alone() {
    let mut old = widget("gear", 2);
    let mut new = widget("sprocket", 3);
    new.tags.clear();
    new.on_change = None;
    new.hook = None;

    load_diff(&mut old, &new, &PatchOptions::new().include_nil_values());
    assert_eq!(old.name, "sprocket");
    assert_eq!(old.version, 3);
    assert_eq!(old.tags, vec!["a".to_string()]);
    assert!(old.on_change.is_some());
    assert!(old.hook.as_ref().is_some_and(|hook| hook(1)));
}

#[test]
fn insert_skips_excluded_fields() {
    let rows = vec![widget("gear", 1), widget("cog", 0)];
    let (sql, args) = InsertBatch::new(&rows, PatchOptions::new())
        .unwrap()
        .generate_sql()
        .unwrap();
    assert_eq!(sql, "INSERT INTO widgets (name, version) VALUES (?, ?), (?, ?)");
    assert_eq!(args, args!["gear", 1, "cog", 0]);
}
