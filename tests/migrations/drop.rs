use super::run;
use crate::helpers::fake_db::{Call, FakeDb};
use crate::helpers::schema::{comments, posts, users};

#[tokio::test]
async fn test_drop_without_history_is_a_no_op() {
    let mut db = FakeDb::new();

    assert!(run(&mut db, "drop", vec![]).await);
    assert!(db.executed().is_empty());
    assert_eq!(db.count(&Call::Begin), 0);
}

#[tokio::test]
async fn test_drops_recorded_tables_in_reverse_order() {
    let mut db = FakeDb::new();
    assert!(run(&mut db, "migrate", vec![posts(), comments(), users()]).await);
    db.clear_calls();

    // the declared set is irrelevant to drop
    assert!(run(&mut db, "drop", vec![users()]).await);

    assert_eq!(
        db.executed(),
        vec![
            "drop table if exists comments, posts, users",
            "drop table if exists migrations",
        ]
    );
    assert_eq!(db.calls.last(), Some(&Call::Commit));
    assert!(db.history.is_none());
}

#[tokio::test]
async fn test_failed_table_drop_keeps_history() {
    let mut db = FakeDb::new();
    assert!(run(&mut db, "migrate", vec![users()]).await);
    db.failing.push("drop table if exists users".to_string());
    db.clear_calls();

    assert!(!run(&mut db, "drop", vec![]).await);
    assert_eq!(db.executed(), vec!["drop table if exists users"]);
    assert_eq!(db.count(&Call::Rollback), 1);
    assert_eq!(db.recorded_migrations(), 1);
}

#[tokio::test]
async fn test_failed_bookkeeping_drop_rolls_back() {
    let mut db = FakeDb::new();
    assert!(run(&mut db, "migrate", vec![users()]).await);
    db.failing.push("drop table if exists migrations".to_string());
    db.clear_calls();

    assert!(!run(&mut db, "drop", vec![]).await);
    assert_eq!(db.count(&Call::Rollback), 1);
    assert_eq!(db.count(&Call::Commit), 0);
}
