use super::{Project, SCHEMA};
use predicates::prelude::*;

#[test]
fn test_check_prints_migration_order() {
    let project = Project::new().with_file("schema.yaml", SCHEMA);

    project
        .command()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 tables"))
        .stdout(predicate::str::contains("1. users"))
        .stdout(predicate::str::contains("2. posts -> users"));
}

#[test]
fn test_check_reads_schema_file_from_config() {
    let project = Project::new()
        .with_file("snapmig.yaml", "schema:\n  file: declared.yaml\n")
        .with_file("declared.yaml", SCHEMA);

    project
        .command()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("declared.yaml"));
}

#[test]
fn test_check_verbose_prints_create_statements() {
    let project = Project::new().with_file("tables.yaml", SCHEMA);

    project
        .command()
        .args(["check", "--schema-file", "tables.yaml", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create table users("))
        .stdout(predicate::str::contains(
            "constraint FK_posts_user_id foreign key (user_id) references users(id)",
        ));
}

#[test]
fn test_check_rejects_cycle() {
    let schema = r#"
tables:
  - name: a
    description: |
      id: id
      b_id -> b: uint
  - name: b
    description: |
      id: id
      a_id -> a: uint
"#;
    let project = Project::new().with_file("schema.yaml", schema);

    project
        .command()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot order tables"));
}

#[test]
fn test_check_rejects_table_named_like_history() {
    let schema = "tables:\n  - name: migrations\n    description: |\n      id: id\n";
    let project = Project::new().with_file("schema.yaml", schema);

    project
        .command()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("reserved for the migration history"));

    project
        .command()
        .args(["check", "--tracking-table", "schema_history"])
        .assert()
        .success();
}
