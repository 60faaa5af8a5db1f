use super::run;
use crate::helpers::fake_db::{Call, FakeDb};
use crate::helpers::schema::{posts, users};
use snapmig::db::DryRunDb;
use snapmig::migration::Migration;

#[tokio::test]
async fn test_dry_run_records_without_executing() {
    let mut db = FakeDb::new();
    let mut dry = DryRunDb::new(&mut db);
    {
        let mut migration = Migration::new(&mut dry, "app", vec![posts(), users()]);
        assert!(migration.run("migrate").await);
    }
    let statements = dry.statements().to_vec();

    assert_eq!(statements.len(), 4);
    assert!(statements[0].starts_with("create table users("));
    assert!(statements[1].starts_with("create table posts("));
    assert!(statements[3].starts_with("insert into migrations("));

    assert!(db.executed().is_empty());
    assert_eq!(db.count(&Call::Begin), 0);
    assert_eq!(db.recorded_migrations(), 0);
}

#[tokio::test]
async fn test_dry_run_diffs_against_recorded_snapshot() {
    let mut db = FakeDb::new();
    assert!(run(&mut db, "migrate", vec![users()]).await);
    db.clear_calls();

    let mut changed = users();
    changed.generate("bio: text").unwrap();

    let mut dry = DryRunDb::new(&mut db);
    {
        let mut migration = Migration::new(&mut dry, "app", vec![changed]);
        assert!(migration.run("migrate").await);
    }
    let statements = dry.statements().to_vec();

    assert!(statements.contains(&"alter table users add column bio text".to_string()));
    assert!(statements.iter().all(|sql| !sql.starts_with("create table users")));
    assert_eq!(db.recorded_migrations(), 1);
}
