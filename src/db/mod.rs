//! Minimal database capability the migration engine runs against.
//!
//! Statements use positional `?` placeholders only.
pub mod connection;
pub mod dry_run;
pub mod error_context;
pub mod mysql;

pub use dry_run::DryRunDb;
pub use mysql::MySqlDb;

use chrono::NaiveDateTime;
use std::collections::BTreeMap;

use crate::error::DbError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    /// Raw bytes of a text or binary value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            SqlValue::Text(s) => Some(s.as_bytes()),
            SqlValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            SqlValue::Text(s) => Some(s.clone()),
            SqlValue::Bytes(b) => String::from_utf8(b.clone()).ok(),
            SqlValue::Int(i) => Some(i.to_string()),
            SqlValue::Timestamp(t) => Some(t.format("%Y-%m-%d %H:%M:%S%.6f").to_string()),
            SqlValue::Null => None,
        }
    }
}

/// One fetched row keyed by column name.
pub type Row = BTreeMap<String, SqlValue>;

#[allow(async_fn_in_trait)]
pub trait Db {
    /// Run a statement, returning the number of affected rows.
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, DbError>;

    async fn fetch_all(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, DbError>;

    async fn begin_transaction(&mut self) -> Result<(), DbError>;

    async fn commit(&mut self) -> Result<(), DbError>;

    async fn rollback(&mut self) -> Result<(), DbError>;
}

impl<D: Db> Db for &mut D {
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, DbError> {
        (**self).execute(sql, params).await
    }

    async fn fetch_all(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, DbError> {
        (**self).fetch_all(sql, params).await
    }

    async fn begin_transaction(&mut self) -> Result<(), DbError> {
        (**self).begin_transaction().await
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        (**self).commit().await
    }

    async fn rollback(&mut self) -> Result<(), DbError> {
        (**self).rollback().await
    }
}
