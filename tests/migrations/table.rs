use crate::helpers::fake_db::FakeDb;
use crate::helpers::schema::users;
use snapmig::catalog::Table;
use snapmig::error::DeclarationError;

#[tokio::test]
async fn test_create_and_drop_single_table() {
    let mut db = FakeDb::new();
    let table = users();

    assert!(table.create(&mut db).await);
    assert!(table.drop(&mut db).await);

    let executed = db.executed();
    assert!(executed[0].starts_with("create table users(\n\tid int(16) unsigned auto_increment,"));
    assert_eq!(executed[1], "drop table if exists users");
}

#[tokio::test]
async fn test_migrate_runs_every_statement_after_a_failure() {
    let mut db = FakeDb::new().failing_on("drop index");
    let mut declared = users();
    declared.text("bio");

    let ok = declared.migrate(&mut db, Some(&users())).await.unwrap();

    assert!(!ok);
    assert_eq!(
        db.executed(),
        vec![
            "alter table users drop index UK_users_email",
            "alter table users add constraint UK_users_email unique key (email)",
            "alter table users add column bio text",
        ]
    );
}

#[tokio::test]
async fn test_migrate_onto_another_table_is_rejected() {
    let mut db = FakeDb::new();

    let err = users()
        .migrate(&mut db, Some(&Table::new("accounts")))
        .await
        .unwrap_err();

    assert!(matches!(err, DeclarationError::NameMismatch { .. }));
    assert!(db.calls.is_empty());
}

#[tokio::test]
async fn test_if_not_exists_table() {
    let mut db = FakeDb::new();
    let mut table = Table::if_not_exists("settings");
    table.string("name", 64).primary();
    table.text("value");

    assert!(table.create(&mut db).await);
    assert_eq!(
        db.executed(),
        vec![
            "create table if not exists settings(\n\
             \tname varchar(64),\n\
             \tvalue text,\n\
             \tconstraint PK_settings_name primary key (name)\n\
             );"
        ]
    );
}
