#![cfg(feature = "sqlite")]

use sql_session::prelude::*;

fn session_with_ledger() -> Session {
    let config = SessionConfig::builder().database(":memory:").finish();
    let mut db = Session::open(BackendKind::Sqlite, config).unwrap();
    db.execute(
        "CREATE TABLE ledger (id INTEGER PRIMARY KEY, amount INTEGER NOT NULL)",
        &[],
        ExecuteOptions::default(),
    )
    .unwrap();
    db
}

fn count(db: &mut Session) -> i64 {
    db.scalar("SELECT count(*) FROM ledger", &[], 0, 0)
        .unwrap()
        .and_then(|v| v.as_int())
        .unwrap()
}

#[test]
fn begin_rollback_discards_changes() {
    let mut db = session_with_ledger();
    db.begin().unwrap();
    assert!(db.in_transaction());
    db.execute(
        "INSERT INTO ledger (amount) VALUES (%d)",
        &[SqlValue::Int(100)],
        ExecuteOptions::default(),
    )
    .unwrap();
    assert_eq!(count(&mut db), 1);
    db.rollback().unwrap();
    assert!(!db.in_transaction());
    assert_eq!(count(&mut db), 0);
}

#[test]
fn begin_commit_persists_changes() {
    let mut db = session_with_ledger();
    db.begin().unwrap();
    db.execute(
        "INSERT INTO ledger (amount) VALUES (%d)",
        &[SqlValue::Int(42)],
        ExecuteOptions::default(),
    )
    .unwrap();
    db.commit().unwrap();
    assert!(!db.in_transaction());
    assert_eq!(count(&mut db), 1);
}

#[test]
fn commit_without_begin_is_a_no_op() {
    let mut db = session_with_ledger();
    db.commit().unwrap();
    assert!(!db.in_transaction());
}

#[test]
fn rollback_without_begin_fails() {
    let mut db = session_with_ledger();
    let err = db.rollback().unwrap_err();
    assert!(matches!(err, SqlSessionError::ConfigError(_)));
}

#[test]
fn reentrant_begin_is_rejected() {
    let mut db = session_with_ledger();
    db.begin().unwrap();
    let err = db.begin().unwrap_err();
    assert!(matches!(err, SqlSessionError::ConfigError(_)));
    // The open transaction is untouched.
    assert!(db.in_transaction());
    db.rollback().unwrap();
}

#[test]
fn transaction_control_requires_connection() {
    let mut db = session_with_ledger();
    db.close().unwrap();
    assert!(matches!(db.begin(), Err(SqlSessionError::ConfigError(_))));
    assert!(matches!(db.commit(), Err(SqlSessionError::ConfigError(_))));
    assert!(matches!(db.rollback(), Err(SqlSessionError::ConfigError(_))));
}

#[test]
fn failed_statement_inside_transaction_leaves_flag_set() {
    let mut db = session_with_ledger();
    db.begin().unwrap();
    let err = db.execute(
        "INSERT INTO ledger (amount) VALUES (%d)",
        &[SqlValue::Null],
        ExecuteOptions::default(),
    );
    assert!(err.is_err());
    // Callers decide how to recover; the session still reports the open
    // transaction.
    assert!(db.in_transaction());
    db.rollback().unwrap();
    assert_eq!(count(&mut db), 0);
}
