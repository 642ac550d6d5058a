#![allow(dead_code)]

use sqlpatch::{
    Join, PatchError, PatchOptions, PlaceholderStyle, Record, SqlPatch, Value, Where, args,
    generate_sql,
};

#[derive(Record)]
#[sqlpatch(table = "people")]
pub struct Person {
    #[sqlpatch(db = "id")]
    pub id: i64,
    #[sqlpatch(db = "name")]
    pub name: String,
}

#[derive(Record)]
pub struct TestObj {
    #[sqlpatch(db = "id")]
    pub id: Option<i64>,
    #[sqlpatch(db = "name")]
    pub name: Option<String>,
    #[sqlpatch(db = "description")]
    pub description: Option<String>,
}

fn john() -> Person {
    Person {
        id: 1,
        name: "john".to_string(),
    }
}

#[test]
fn update_people_by_id() {
    let (sql, args) = generate_sql(
        &john(),
        PatchOptions::new().filter(Where::new("id = ?", [1])),
    )
    .unwrap();

    assert_eq!(
        sql,
        "UPDATE people\nSET id = ?, name = ?\nWHERE (1=1)\nAND (\nid = ?\n)"
    );
    assert_eq!(args, args![1, "john", 1]);
}

#[test]
fn identical_inputs_render_identically() {
    let opts = || PatchOptions::new().filter(Where::new("id = ?", [1]));
    let first = generate_sql(&john(), opts()).unwrap();
    let second = generate_sql(&john(), opts()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn table_option_overrides_record_table() {
    let (sql, _) = generate_sql(
        &john(),
        PatchOptions::new()
            .table("test_table")
            .filter(Where::new("age = ?", [18])),
    )
    .unwrap();
    assert!(sql.starts_with("UPDATE test_table\n"));
}

#[test]
fn where_combinators() {
    let (sql, args) = generate_sql(
        &john(),
        PatchOptions::new()
            .filter(Where::new("age = ?", [18]))
            .filter(Where::or("name = ?", ["john"]))
            .filter(Where::new("id = ?", [1]).with_type("XOR")),
    )
    .unwrap();

    assert_eq!(
        sql,
        "UPDATE people\nSET id = ?, name = ?\nWHERE (1=1)\nAND (\nage = ?\nOR name = ?\nAND id = ?\n)"
    );
    assert_eq!(args, args![1, "john", 18, "john", 1]);
}

#[test]
fn where_without_args() {
    let (sql, args) = generate_sql(
        &john(),
        PatchOptions::new().filter(Where::new("age > 18", Vec::<Value>::new())),
    )
    .unwrap();
    assert_eq!(
        sql,
        "UPDATE people\nSET id = ?, name = ?\nWHERE (1=1)\nAND (\nage > 18\n)"
    );
    assert_eq!(args, args![1, "john"]);
}

#[test]
fn joins_precede_set_and_args_align() {
    let (sql, args) = generate_sql(
        &john(),
        PatchOptions::new()
            .table("table1")
            .filter(Join::new("JOIN table2 ON table1.id = table2.id AND table2.kind = ?", ["a"]))
            .filter(Join::new("JOIN table3 ON table1.id = table3.id", Vec::<Value>::new()))
            .filter(Where::new("age = ?", [18])),
    )
    .unwrap();

    assert_eq!(
        sql,
        "UPDATE table1\nJOIN table2 ON table1.id = table2.id AND table2.kind = ?\nJOIN table3 ON table1.id = table3.id\nSET id = ?, name = ?\nWHERE (1=1)\nAND (\nage = ?\n)"
    );
    // join args, then column args, then where args
    assert_eq!(args, args!["a", 1, "john", 18]);
}

#[test]
fn limit_and_offset_are_literals() {
    let (sql, args) = generate_sql(
        &john(),
        PatchOptions::new()
            .filter(Where::new("id = ?", [1]))
            .limit(10)
            .offset(5),
    )
    .unwrap();
    assert!(sql.ends_with(")\nLIMIT 10\nOFFSET 5"));
    assert_eq!(args.len(), 3);
}

#[test]
fn dollar_placeholders() {
    let (sql, _) = generate_sql(
        &john(),
        PatchOptions::new()
            .filter(Join::new("JOIN t2 ON t2.id = people.id AND t2.kind = ?", ["a"]))
            .filter(Where::new("id = ?", [1]))
            .placeholder(PlaceholderStyle::Dollar),
    )
    .unwrap();
    assert_eq!(
        sql,
        "UPDATE people\nJOIN t2 ON t2.id = people.id AND t2.kind = $1\nSET id = $2, name = $3\nWHERE (1=1)\nAND (\nid = $4\n)"
    );
}

#[test]
fn dollar_placeholders_skip_comments() {
    let (sql, args) = generate_sql(
        &john(),
        PatchOptions::new()
            .filter(Where::new("-- which row?\nid = ? /* not ? this */", [1]))
            .placeholder(PlaceholderStyle::Dollar),
    )
    .unwrap();
    assert_eq!(
        sql,
        "UPDATE people\nSET id = $1, name = $2\nWHERE (1=1)\nAND (\n-- which row?\nid = $3 /* not ? this */\n)"
    );
    assert_eq!(args.len(), 3);
}

#[test]
fn validation_order() {
    // no table: the record has none and none is configured
    let obj = TestObj {
        id: Some(1),
        name: None,
        description: None,
    };
    let err = generate_sql(&obj, PatchOptions::new()).unwrap_err();
    assert!(matches!(err, PatchError::MissingConfiguration("table")));

    // no fields
    let empty = TestObj {
        id: None,
        name: None,
        description: None,
    };
    let err = generate_sql(&empty, PatchOptions::new().table("t")).unwrap_err();
    assert!(matches!(err, PatchError::EmptyResult("fields")));

    // no where
    let err = generate_sql(&obj, PatchOptions::new().table("t")).unwrap_err();
    assert!(matches!(err, PatchError::EmptyResult("where")));
}

#[test]
fn include_nil_values() {
    let obj = TestObj {
        id: Some(1),
        name: None,
        description: None,
    };
    let (sql, args) = generate_sql(
        &obj,
        PatchOptions::new()
            .table("test_table")
            .filter(Where::new("id = ?", [1]))
            .include_nil_values(),
    )
    .unwrap();
    assert_eq!(
        sql,
        "UPDATE test_table\nSET id = ?, name = ?, description = ?\nWHERE (1=1)\nAND (\nid = ?\n)"
    );
    assert_eq!(args, vec![Value::Int(1), Value::Null, Value::Null, Value::Int(1)]);
}

#[test]
fn include_zero_values_leaves_absent_out() {
    let obj = TestObj {
        id: Some(1),
        name: Some(String::new()),
        description: None,
    };
    let patch = SqlPatch::new(
        &obj,
        PatchOptions::new()
            .table("test_table")
            .filter(Where::new("id = ?", [1]))
            .include_zero_values(),
    )
    .unwrap();
    assert_eq!(
        patch.fields(),
        Some(vec!["id = ?".to_string(), "name = ?".to_string()])
    );
    assert_eq!(patch.args(), Some(&args![1, ""][..]));
}

#[test]
fn getters_are_none_when_empty() {
    let empty = TestObj {
        id: None,
        name: None,
        description: None,
    };
    let patch = SqlPatch::new(&empty, PatchOptions::new()).unwrap();
    assert!(patch.fields().is_none());
    assert!(patch.args().is_none());
}
