//! Read-through, write-recording database wrapper used by `--dry-run`.
use tracing::info;

use super::{Db, Row, SqlValue};
use crate::error::DbError;

/// Reads go to the wrapped database; writes are recorded and reported as successful.
pub struct DryRunDb<D> {
    inner: D,
    statements: Vec<String>,
}

impl<D: Db> DryRunDb<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            statements: Vec::new(),
        }
    }

    /// Statements that would have been executed, in order.
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: Db> Db for DryRunDb<D> {
    async fn execute(&mut self, sql: &str, _params: &[SqlValue]) -> Result<u64, DbError> {
        info!(sql, "dry run: not executed");
        self.statements.push(sql.to_string());
        Ok(0)
    }

    async fn fetch_all(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, DbError> {
        self.inner.fetch_all(sql, params).await
    }

    async fn begin_transaction(&mut self) -> Result<(), DbError> {
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DbError> {
        Ok(())
    }
}
