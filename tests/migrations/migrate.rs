use super::run;
use crate::helpers::fake_db::{Call, FakeDb, TRACKING_TABLE};
use crate::helpers::schema::{comments, posts, users};
use rstest::rstest;
use snapmig::catalog::Table;
use snapmig::error::DbError;
use snapmig::migration::Migration;
use snapmig::migration::tracking::{last_migration, last_tables};

#[tokio::test]
async fn test_creates_tables_after_their_references() {
    let mut db = FakeDb::new();

    assert!(run(&mut db, "migrate", vec![comments(), posts(), users()]).await);

    let ddl = db.ddl();
    assert_eq!(ddl.len(), 3);
    assert!(ddl[0].starts_with("create table users("));
    assert!(ddl[1].starts_with("create table posts("));
    assert!(ddl[2].starts_with("create table comments("));
    assert!(ddl[1].contains(
        "constraint FK_posts_user_id foreign key (user_id) references users(id) on delete cascade on update no action"
    ));

    assert_eq!(db.calls.first(), Some(&Call::Fetch(format!(
        "select host, created_at, tables from {} order by created_at desc limit 1",
        TRACKING_TABLE
    ))));
    assert_eq!(db.calls.last(), Some(&Call::Commit));
    assert_eq!(db.count(&Call::Begin), 1);
    assert_eq!(db.count(&Call::Rollback), 0);
}

#[tokio::test]
async fn test_records_snapshot_in_migration_order() {
    let mut db = FakeDb::new();
    assert!(run(&mut db, "migrate", vec![posts(), users()]).await);
    assert_eq!(db.recorded_migrations(), 1);

    let executed = db.executed();
    assert!(executed[2].starts_with(&format!("create table if not exists {}(", TRACKING_TABLE)));
    assert_eq!(
        executed[3],
        format!("insert into {}(host, created_at, tables) values(?, ?, ?)", TRACKING_TABLE)
    );

    let tables = last_tables(&mut db, TRACKING_TABLE).await.unwrap();
    let names: Vec<_> = tables.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["users", "posts"]);
}

#[tokio::test]
async fn test_second_run_without_changes_executes_no_ddl() {
    let mut db = FakeDb::new();
    assert!(run(&mut db, "migrate", vec![users(), posts()]).await);
    db.clear_calls();

    assert!(run(&mut db, "migrate", vec![users(), posts()]).await);
    assert!(db.ddl().is_empty());
    assert_eq!(db.recorded_migrations(), 2);
}

fn declared_users(description: &str) -> Table {
    let mut table = Table::new("users");
    table.generate(description).unwrap();
    table
}

#[rstest]
#[case::added_column(
    "id: id\nemail* U: string(128)\nname: string\nage: uint",
    "alter table users add column age int(16) unsigned"
)]
#[case::changed_column(
    "id: id\nemail* U: string(255)\nname: string",
    "alter table users change email email varchar(255) not null"
)]
#[case::nullable_column(
    "id: id\nemail U: string(128)\nname: string",
    "alter table users change email email varchar(128)"
)]
#[case::dropped_column(
    "id: id\nemail* U: string(128)",
    "alter table users drop column name"
)]
#[tokio::test]
async fn test_existing_table_is_altered(#[case] description: &str, #[case] expected: &str) {
    let mut db = FakeDb::new();
    assert!(run(&mut db, "migrate", vec![users()]).await);
    db.clear_calls();

    assert!(run(&mut db, "migrate", vec![declared_users(description)]).await);

    let ddl = db.ddl();
    assert!(ddl.contains(&expected), "{:?} not in {:#?}", expected, ddl);
    assert!(ddl.iter().all(|sql| !sql.starts_with("create table")));
}

#[tokio::test]
async fn test_removed_tables_are_dropped_in_one_statement() {
    let mut db = FakeDb::new();
    assert!(run(&mut db, "migrate", vec![users(), posts(), comments()]).await);
    db.clear_calls();

    assert!(run(&mut db, "migrate", vec![users()]).await);
    assert_eq!(db.ddl(), vec!["drop table if exists comments, posts"]);

    let tables = last_tables(&mut db, TRACKING_TABLE).await.unwrap();
    assert_eq!(tables.len(), 1);
}

#[tokio::test]
async fn test_inactive_table_is_recorded_but_not_touched() {
    let mut audit = Table::new("audit_log");
    audit.generate("id: id\npayload: json").unwrap();
    audit.set_active(false);

    let mut db = FakeDb::new();
    assert!(run(&mut db, "migrate", vec![users(), audit]).await);

    assert_eq!(db.ddl().len(), 1);
    assert!(db.ddl().iter().all(|sql| !sql.contains("audit_log")));

    let tables = last_tables(&mut db, TRACKING_TABLE).await.unwrap();
    let audit = tables.iter().find(|t| t.name() == "audit_log").unwrap();
    assert!(!audit.active());
}

#[tokio::test]
async fn test_failed_statement_rolls_back_without_snapshot() {
    let mut db = FakeDb::new().failing_on("create table posts");

    assert!(!run(&mut db, "migrate", vec![users(), posts(), comments()]).await);

    // later tables are still attempted
    let ddl = db.ddl();
    assert_eq!(ddl.len(), 3);
    assert!(ddl[2].starts_with("create table comments("));

    assert_eq!(db.count(&Call::Rollback), 1);
    assert_eq!(db.count(&Call::Commit), 0);
    assert_eq!(db.recorded_migrations(), 0);
}

#[tokio::test]
async fn test_failed_snapshot_write_rolls_back() {
    let mut db = FakeDb::new().failing_on("insert into migrations");

    assert!(!run(&mut db, "migrate", vec![users()]).await);
    assert_eq!(db.count(&Call::Rollback), 1);
    assert_eq!(db.count(&Call::Commit), 0);
    assert_eq!(db.recorded_migrations(), 0);
}

#[tokio::test]
async fn test_cycle_fails_before_touching_the_database() {
    let mut a = Table::new("a");
    a.generate("id: id\nb_id -> b: uint").unwrap();
    let mut b = Table::new("b");
    b.generate("id: id\na_id -> a: uint").unwrap();

    let mut db = FakeDb::new();
    assert!(!run(&mut db, "migrate", vec![a, b]).await);
    assert!(db.calls.is_empty());
}

#[tokio::test]
async fn test_reference_to_undeclared_table_fails() {
    let mut db = FakeDb::new();
    assert!(!run(&mut db, "migrate", vec![posts()]).await);
    assert!(db.calls.is_empty());
}

#[tokio::test]
async fn test_duplicate_table_fails() {
    let mut db = FakeDb::new();
    assert!(!run(&mut db, "migrate", vec![users(), users()]).await);
    assert!(db.calls.is_empty());
}

#[tokio::test]
async fn test_table_named_like_history_is_rejected() {
    let mut history = Table::new(TRACKING_TABLE);
    history.generate("id: id\nname: string").unwrap();

    let mut db = FakeDb::new();
    assert!(!run(&mut db, "migrate", vec![users(), history]).await);
    assert!(db.calls.is_empty());
}

#[tokio::test]
async fn test_table_named_like_default_history_is_fine_with_custom_tracking_table() {
    let mut history = Table::new("migrations");
    history.generate("id: id\nname: string").unwrap();

    let mut db = FakeDb::new().with_tracking_table("schema_history");
    {
        let mut migration =
            Migration::new(&mut db, "app", vec![history]).with_tracking_table("schema_history");
        assert!(migration.run("migrate").await);
    }
    assert_eq!(db.ddl().len(), 1);
    assert!(db.ddl()[0].starts_with("create table migrations("));
    assert_eq!(db.recorded_migrations(), 1);
}

#[tokio::test]
async fn test_unreadable_history_aborts() {
    let mut db = FakeDb::new();
    db.load_error = Some(DbError::with_code("Access denied", "42000"));

    assert!(!run(&mut db, "migrate", vec![users()]).await);
    assert!(db.executed().is_empty());
    assert_eq!(db.count(&Call::Begin), 0);
}

#[tokio::test]
async fn test_unsupported_program_does_nothing() {
    let mut db = FakeDb::new();
    assert!(!run(&mut db, "seed", vec![users()]).await);
    assert!(db.calls.is_empty());
}

#[tokio::test]
async fn test_custom_host_and_tracking_table() {
    let mut db = FakeDb::new().with_tracking_table("schema_history");
    {
        let mut migration = Migration::new(&mut db, "app", vec![users()])
            .with_host("build-01")
            .with_tracking_table("schema_history");
        assert!(migration.run("migrate").await);
    }

    let record = last_migration(&mut db, "schema_history")
        .await
        .unwrap()
        .expect("a recorded migration");
    assert_eq!(record.host, "build-01");
    assert!(record.created_at.is_some());
    assert_eq!(record.snapshot.tables.len(), 1);
}
