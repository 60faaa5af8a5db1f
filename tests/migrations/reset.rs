use super::run;
use crate::helpers::fake_db::FakeDb;
use crate::helpers::schema::{posts, users};

#[tokio::test]
async fn test_reset_drops_then_recreates() {
    let mut db = FakeDb::new();
    assert!(run(&mut db, "migrate", vec![users(), posts()]).await);
    db.clear_calls();

    assert!(run(&mut db, "reset", vec![users(), posts()]).await);

    let ddl = db.ddl();
    assert_eq!(ddl[0], "drop table if exists posts, users");
    assert!(ddl[1].starts_with("create table users("));
    assert!(ddl[2].starts_with("create table posts("));
    assert_eq!(ddl.len(), 3);
    assert_eq!(db.recorded_migrations(), 1);
}

#[tokio::test]
async fn test_reset_migrates_even_when_drop_fails() {
    let mut db = FakeDb::new();
    assert!(run(&mut db, "migrate", vec![users()]).await);
    db.failing.push("drop table if exists users".to_string());
    db.clear_calls();

    assert!(!run(&mut db, "reset", vec![users()]).await);

    // history survived the failed drop, so migrate finds nothing to change and records again
    assert_eq!(db.ddl(), vec!["drop table if exists users"]);
    assert_eq!(db.recorded_migrations(), 2);
}
