use super::{Project, SCHEMA};
use predicates::prelude::*;

#[test]
fn test_missing_schema_file() {
    Project::new()
        .command()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read schema file"));
}

#[test]
fn test_unknown_column_type() {
    let schema = "tables:\n  - name: shapes\n    description: |\n      id: id\n      outline: geometry\n";
    let project = Project::new().with_file("schema.yaml", schema);

    project
        .command()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("geometry"));
}

#[test]
fn test_invalid_config_yaml() {
    let project = Project::new()
        .with_file("snapmig.yaml", "schema: [unbalanced")
        .with_file("schema.yaml", SCHEMA);

    project
        .command()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_migrate_requires_database_url() {
    let project = Project::new().with_file("schema.yaml", SCHEMA);

    project
        .command()
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No database URL configured"));
}

#[test]
fn test_drop_refuses_to_run_unattended() {
    let project = Project::new();

    project
        .command()
        .args(["drop", "--database-url", "mysql://root@127.0.0.1:1/app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_invalid_tracking_table_name() {
    let project = Project::new().with_file("schema.yaml", SCHEMA);

    project
        .command()
        .args(["status", "--tracking-table", "bad-name"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad-name"));
}
