//! [`Db`] over a single sqlx MySQL connection.
use anyhow::Result;
use chrono::NaiveDateTime;
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column as _, Row as _};
use tracing::debug;

use super::connection::connect_with_retry;
use super::error_context::db_error;
use super::{Db, Row, SqlValue};
use crate::error::DbError;

pub struct MySqlDb {
    conn: MySqlConnection,
}

impl MySqlDb {
    pub fn new(conn: MySqlConnection) -> Self {
        Self { conn }
    }

    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(connect_with_retry(url).await?))
    }

    async fn raw(&mut self, sql: &str) -> Result<u64, DbError> {
        sqlx::raw_sql(sql)
            .execute(&mut self.conn)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| db_error(&e))
    }
}

fn bind<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [SqlValue],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Text(s) => query.bind(s.as_str()),
            SqlValue::Bytes(b) => query.bind(b.as_slice()),
            SqlValue::Timestamp(t) => query.bind(*t),
        };
    }
    query
}

fn decode_value(row: &MySqlRow, index: usize) -> SqlValue {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v.map_or(SqlValue::Null, SqlValue::Int);
    }
    if let Ok(v) = row.try_get::<Option<NaiveDateTime>, _>(index) {
        return v.map_or(SqlValue::Null, SqlValue::Timestamp);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v.map_or(SqlValue::Null, SqlValue::Text);
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return v.map_or(SqlValue::Null, SqlValue::Bytes);
    }
    SqlValue::Null
}

fn decode_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .map(|column| (column.name().to_string(), decode_value(row, column.ordinal())))
        .collect()
}

impl Db for MySqlDb {
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, DbError> {
        debug!(sql, params = params.len(), "execute");
        if params.is_empty() {
            return self.raw(sql).await;
        }
        bind(sqlx::query(sql), params)
            .execute(&mut self.conn)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| db_error(&e))
    }

    async fn fetch_all(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, DbError> {
        debug!(sql, params = params.len(), "fetch");
        let rows = bind(sqlx::query(sql), params)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| db_error(&e))?;
        Ok(rows.iter().map(decode_row).collect())
    }

    async fn begin_transaction(&mut self) -> Result<(), DbError> {
        self.raw("start transaction").await.map(|_| ())
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        self.raw("commit").await.map(|_| ())
    }

    async fn rollback(&mut self) -> Result<(), DbError> {
        self.raw("rollback").await.map(|_| ())
    }
}
