//! Migration runs against an in-memory database.
//!
//! Every suite drives [`snapmig::migration::Migration`] over a `FakeDb`, which records
//! each call and emulates the bookkeeping table, so statement order and transaction
//! handling can be asserted without a MySQL server.
pub mod drop;
pub mod dry_run;
pub mod migrate;
pub mod reset;
pub mod table;

use crate::helpers::fake_db::FakeDb;
use snapmig::catalog::Table;
use snapmig::migration::Migration;

/// Run `program` over `db` with the default bookkeeping table.
pub async fn run(db: &mut FakeDb, program: &str, tables: Vec<Table>) -> bool {
    let mut migration = Migration::new(db, "app", tables);
    migration.run(program).await
}
