#![allow(dead_code)]

use sqlpatch::{PatchOptions, Record, load_diff};

#[derive(Record, Clone, Debug, PartialEq, Default)]
pub struct Person {
    pub name: String,
    pub age: i32,
}

#[derive(Record, Clone, Debug, PartialEq, Default)]
pub struct WithOptional {
    pub name: String,
    #[sqlpatch(omitempty)]
    pub age: Option<i32>,
}

#[derive(Record, Clone, Debug, PartialEq, Default)]
pub struct ZeroAllowed {
    pub name: String,
    #[sqlpatch(omitempty)]
    pub age: i32,
}

#[derive(Record, Clone, Debug, PartialEq, Default)]
pub struct Partnered {
    pub name: String,
    pub age: i32,
    pub partner: Option<Box<Partnered>>,
}

#[derive(Record, Clone, Debug, PartialEq, Default)]
pub struct Description {
    pub description: String,
}

#[derive(Record, Clone, Debug, PartialEq, Default)]
pub struct Embedding {
    #[sqlpatch(embed)]
    pub base: Description,
    pub name: String,
    pub age: i32,
}

#[derive(Record, Clone, Debug, PartialEq, Default)]
pub struct Skipping {
    #[sqlpatch(skip)]
    pub id: i32,
    pub name: String,
}

#[test]
fn loads_new_values() {
    let mut old = Person {
        name: "John".into(),
        age: 25,
    };
    let new = Person {
        name: "John Smith".into(),
        age: 26,
    };
    load_diff(&mut old, &new, &PatchOptions::new());
    assert_eq!(old, new);
}

#[test]
fn zero_values_keep_old() {
    let mut old = Person {
        name: "John".into(),
        age: 25,
    };
    load_diff(&mut old, &Person::default(), &PatchOptions::new());
    assert_eq!(old.name, "John");
    assert_eq!(old.age, 25);

    let new = Person {
        name: String::new(),
        age: 26,
    };
    load_diff(&mut old, &new, &PatchOptions::new());
    assert_eq!(old.name, "John");
    assert_eq!(old.age, 26);
}

#[test]
fn omitempty_admits_nil_and_zero() {
    let mut old = WithOptional {
        name: "John".into(),
        age: Some(25),
    };
    let new = WithOptional {
        name: "John Smith".into(),
        age: None,
    };
    load_diff(&mut old, &new, &PatchOptions::new());
    assert_eq!(old.name, "John Smith");
    assert_eq!(old.age, None);

    let mut old = ZeroAllowed {
        name: "John".into(),
        age: 25,
    };
    let new = ZeroAllowed {
        name: "John Smith".into(),
        age: 0,
    };
    load_diff(&mut old, &new, &PatchOptions::new());
    assert_eq!(old.age, 0);
}

#[test]
fn call_level_zero_inclusion() {
    let mut old = Person {
        name: "John".into(),
        age: 25,
    };
    load_diff(
        &mut old,
        &Person::default(),
        &PatchOptions::new().include_zero_values(),
    );
    assert_eq!(old, Person::default());
}

#[test]
fn new_substructure_is_cloned_in() {
    let mut old = Partnered {
        name: "John".into(),
        age: 25,
        partner: None,
    };
    let new = Partnered {
        partner: Some(Box::new(Partnered {
            name: "Sarah".into(),
            age: 24,
            partner: None,
        })),
        ..Partnered::default()
    };
    load_diff(&mut old, &new, &PatchOptions::new());
    assert_eq!(old.name, "John");
    assert_eq!(old.age, 25);
    let partner = old.partner.as_deref().unwrap();
    assert_eq!(partner.name, "Sarah");
    assert_eq!(partner.age, 24);
}

#[test]
fn present_substructures_merge() {
    let mut old = Partnered {
        name: "John".into(),
        age: 25,
        partner: Some(Box::new(Partnered {
            name: "Sarah".into(),
            age: 24,
            partner: None,
        })),
    };
    let new = Partnered {
        partner: Some(Box::new(Partnered {
            name: "Sarah Thompson".into(),
            age: 0,
            partner: None,
        })),
        ..Partnered::default()
    };
    load_diff(&mut old, &new, &PatchOptions::new());
    let partner = old.partner.as_deref().unwrap();
    assert_eq!(partner.name, "Sarah Thompson");
    assert_eq!(partner.age, 24);
}

#[test]
fn absent_substructure_keeps_old() {
    let mut old = Partnered {
        name: "John".into(),
        age: 25,
        partner: Some(Box::new(Partnered::default())),
    };
    load_diff(
        &mut old,
        &Partnered::default(),
        &PatchOptions::new().include_nil_values(),
    );
    assert!(old.partner.is_some());
}

#[test]
fn embedded_fields_load() {
    let mut old = Embedding {
        base: Description::default(),
        name: "John".into(),
        age: 25,
    };
    let new = Embedding {
        base: Description {
            description: "Some description".into(),
        },
        name: "John Smith".into(),
        age: 26,
    };
    load_diff(&mut old, &new, &PatchOptions::new());
    assert_eq!(old, new);
}

#[test]
fn skipped_and_ignored_fields_keep_old() {
    let mut old = Skipping {
        id: 1,
        name: "John".into(),
    };
    let new = Skipping {
        id: 2,
        name: "John Smith".into(),
    };
    load_diff(&mut old, &new, &PatchOptions::new().ignored_fields(["NAME"]));
    assert_eq!(old.id, 1);
    assert_eq!(old.name, "John");
}
