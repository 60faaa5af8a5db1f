//! Bookkeeping table holding one snapshot row per successful migration.
use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info};

use crate::catalog::snapshot::Snapshot;
use crate::catalog::table::Table;
use crate::db::{Db, SqlValue};
use crate::error::{DeclarationError, PersistenceError};

/// A recorded migration: who ran it, when, and the declared tables at the time.
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    pub host: String,
    pub created_at: Option<String>,
    pub snapshot: Snapshot,
}

/// Declaration of the bookkeeping table, keyed by `(host, created_at)`.
pub fn tracking_table(name: &str) -> Table {
    let mut table = Table::if_not_exists(name);
    table
        .string("host", 255)
        .not_nullable()
        .primary_composite(false);
    table
        .timestamp("created_at")
        .size(6)
        .default("current_timestamp(6)")
        .not_nullable()
        .primary_composite(true);
    table.blob("tables");
    table
}

/// Reject a declared table that would shadow the bookkeeping table `name`.
pub fn ensure_not_declared(tables: &[Table], name: &str) -> Result<(), DeclarationError> {
    match tables.iter().find(|t| t.name() == name) {
        Some(table) => Err(DeclarationError::ReservedTable(table.name().to_string())),
        None => Ok(()),
    }
}

/// Create the bookkeeping table unless it already exists.
pub async fn ensure_tracking_table<D: Db>(db: &mut D, name: &str) -> Result<(), PersistenceError> {
    let table = tracking_table(name);
    table.validate()?;
    let create = table.create_query()?;

    db.execute(&create, &[])
        .await
        .map_err(|source| PersistenceError::CreateTable {
            table: name.to_string(),
            source,
        })?;
    Ok(())
}

/// Most recent recorded migration, or `None` when there is no history yet.
///
/// A missing bookkeeping table means no history; any other read failure is an error.
pub async fn last_migration<D: Db>(
    db: &mut D,
    name: &str,
) -> Result<Option<MigrationRecord>, PersistenceError> {
    let sql = format!(
        "select host, created_at, tables from {} order by created_at desc limit 1",
        name
    );

    let rows = match db.fetch_all(&sql, &[]).await {
        Ok(rows) => rows,
        Err(e) if e.is_unknown_table() => {
            debug!(table = name, "bookkeeping table does not exist yet");
            return Ok(None);
        }
        Err(source) => {
            return Err(PersistenceError::Load {
                table: name.to_string(),
                source,
            });
        }
    };

    let Some(row) = rows.into_iter().next() else {
        return Ok(None);
    };

    let bytes = row
        .get("tables")
        .and_then(SqlValue::as_bytes)
        .ok_or(PersistenceError::MissingField("tables"))?;
    let snapshot = Snapshot::decode(bytes)?;

    Ok(Some(MigrationRecord {
        host: row
            .get("host")
            .and_then(SqlValue::as_text)
            .unwrap_or_default(),
        created_at: row.get("created_at").and_then(SqlValue::as_text),
        snapshot,
    }))
}

/// Tables of the most recent snapshot, empty when there is no history.
pub async fn last_tables<D: Db>(db: &mut D, name: &str) -> Result<Vec<Table>, PersistenceError> {
    Ok(last_migration(db, name)
        .await?
        .map(|record| record.snapshot.tables)
        .unwrap_or_default())
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Record `tables` as the current declared schema.
pub async fn save_migration<D: Db>(
    db: &mut D,
    name: &str,
    host: &str,
    tables: &[Table],
) -> Result<(), PersistenceError> {
    ensure_tracking_table(db, name).await?;

    let bytes = Snapshot::new(tables.to_vec()).encode()?;
    let sql = format!(
        "insert into {}(host, created_at, tables) values(?, ?, ?)",
        name
    );
    let params = [
        SqlValue::Text(host.to_string()),
        SqlValue::Timestamp(now()),
        SqlValue::Bytes(bytes),
    ];

    db.execute(&sql, &params)
        .await
        .map_err(|source| PersistenceError::Save {
            table: name.to_string(),
            source,
        })?;

    info!(table = name, host, tables = tables.len(), "recorded migration");
    Ok(())
}

pub async fn drop_tracking_table<D: Db>(db: &mut D, name: &str) -> Result<(), PersistenceError> {
    db.execute(&format!("drop table if exists {}", name), &[])
        .await
        .map_err(|source| PersistenceError::Drop {
            table: name.to_string(),
            source,
        })?;
    Ok(())
}
