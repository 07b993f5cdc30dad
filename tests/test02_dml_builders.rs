#![cfg(feature = "sqlite")]

use sql_session::prelude::*;

fn session_with_people() -> Session {
    let config = SessionConfig::builder().database(":memory:").finish();
    let mut db = Session::open(BackendKind::Sqlite, config).unwrap();
    db.execute(
        "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT, age INTEGER, email TEXT)",
        &[],
        ExecuteOptions::default(),
    )
    .unwrap();
    db
}

fn map(entries: &[(&str, SqlValue)]) -> ColumnMap {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

#[test]
fn insert_reports_affected_count_and_key() {
    let mut db = session_with_people();
    let affected = db
        .insert(
            "people",
            &map(&[
                ("name", SqlValue::Text("alice".into())),
                ("age", SqlValue::Int(33)),
            ]),
        )
        .unwrap();
    assert_eq!(affected, 1);
    assert_eq!(db.last_insert_id(), 1);
    assert_eq!(
        db.last_query(),
        Some("INSERT INTO people (name, age) VALUES (?, ?)")
    );

    let age = db
        .scalar(
            "SELECT age FROM people WHERE name = %s",
            &[SqlValue::Text("alice".into())],
            0,
            0,
        )
        .unwrap();
    assert_eq!(age, Some(SqlValue::Int(33)));
}

#[test]
fn insert_binds_null_values() {
    let mut db = session_with_people();
    db.insert(
        "people",
        &map(&[
            ("name", SqlValue::Text("ghost".into())),
            ("email", SqlValue::Null),
        ]),
    )
    .unwrap();
    let email = db
        .scalar("SELECT email FROM people", &[], 0, 0)
        .unwrap();
    assert_eq!(email, Some(SqlValue::Null));
}

#[test]
fn bulk_insert_flattens_groups() {
    let mut db = session_with_people();
    let affected = db
        .bulk_insert(
            "people",
            &["name", "age"],
            &[
                vec![SqlValue::Text("a".into()), SqlValue::Int(1)],
                vec![SqlValue::Text("b".into()), SqlValue::Int(2)],
                vec![SqlValue::Text("c".into()), SqlValue::Int(3)],
            ],
        )
        .unwrap();
    assert_eq!(affected, 3);
    assert_eq!(
        db.last_query(),
        Some("INSERT INTO people (name, age) VALUES (?, ?), (?, ?), (?, ?)")
    );
    let ages = db.column("SELECT age FROM people ORDER BY id", &[], 0).unwrap();
    assert_eq!(ages, vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]);
}

#[test]
fn bulk_insert_arity_mismatch_fails_at_backend() {
    let mut db = session_with_people();
    let result = db.bulk_insert(
        "people",
        &["name", "age"],
        &[vec![SqlValue::Text("only-one".into())]],
    );
    assert!(result.is_err());
}

#[test]
fn update_with_null_set_and_where() {
    let mut db = session_with_people();
    db.bulk_insert(
        "people",
        &["name", "age", "email"],
        &[
            vec![
                SqlValue::Text("a".into()),
                SqlValue::Int(1),
                SqlValue::Text("a@x".into()),
            ],
            vec![
                SqlValue::Text("b".into()),
                SqlValue::Int(2),
                SqlValue::Text("b@x".into()),
            ],
        ],
    )
    .unwrap();

    let affected = db
        .update(
            "people",
            &map(&[("email", SqlValue::Null), ("age", SqlValue::Int(20))]),
            &map(&[("name", SqlValue::Text("b".into()))]),
        )
        .unwrap();
    assert_eq!(affected, 1);
    assert_eq!(
        db.last_query(),
        Some("UPDATE \"people\" SET \"email\" = NULL, \"age\" = ? WHERE \"name\" = ?")
    );

    let row = db
        .query_one(
            "SELECT age, email FROM people WHERE name = %s",
            &[SqlValue::Text("b".into())],
        )
        .unwrap()
        .unwrap();
    assert_eq!(row.get("age"), Some(&SqlValue::Int(20)));
    assert_eq!(row.get("email"), Some(&SqlValue::Null));
}

#[test]
fn delete_with_is_null_condition() {
    let mut db = session_with_people();
    db.bulk_insert(
        "people",
        &["name", "email"],
        &[
            vec![SqlValue::Text("keep".into()), SqlValue::Text("k@x".into())],
            vec![SqlValue::Text("drop1".into()), SqlValue::Null],
            vec![SqlValue::Text("drop2".into()), SqlValue::Null],
        ],
    )
    .unwrap();

    let affected = db
        .delete("people", &map(&[("email", SqlValue::Null)]))
        .unwrap();
    assert_eq!(affected, 2);
    assert_eq!(
        db.last_query(),
        Some("DELETE FROM \"people\" WHERE \"email\" IS NULL")
    );
    let names = db.column("SELECT name FROM people", &[], 0).unwrap();
    assert_eq!(names, vec![SqlValue::Text("keep".into())]);
}

#[test]
fn delete_without_conditions_clears_table() {
    let mut db = session_with_people();
    db.bulk_insert(
        "people",
        &["name"],
        &[
            vec![SqlValue::Text("a".into())],
            vec![SqlValue::Text("b".into())],
        ],
    )
    .unwrap();
    let affected = db.delete("people", &ColumnMap::new()).unwrap();
    assert_eq!(affected, 2);
    let remaining = db.scalar("SELECT count(*) FROM people", &[], 0, 0).unwrap();
    assert_eq!(remaining, Some(SqlValue::Int(0)));
}

#[test]
fn mixed_condition_binds_only_non_null() {
    let mut db = session_with_people();
    db.bulk_insert(
        "people",
        &["name", "age", "email"],
        &[
            vec![SqlValue::Text("a".into()), SqlValue::Int(5), SqlValue::Null],
            vec![SqlValue::Text("b".into()), SqlValue::Int(5), SqlValue::Text("b@x".into())],
        ],
    )
    .unwrap();
    let affected = db
        .delete(
            "people",
            &map(&[("email", SqlValue::Null), ("age", SqlValue::Int(5))]),
        )
        .unwrap();
    assert_eq!(affected, 1);
    assert_eq!(
        db.last_query(),
        Some("DELETE FROM \"people\" WHERE \"email\" IS NULL AND \"age\" = ?")
    );
}
