//! In-memory [`Db`] that records every call and emulates the bookkeeping table.
use snapmig::db::{Db, Row, SqlValue};
use snapmig::error::DbError;

pub const TRACKING_TABLE: &str = "migrations";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Execute(String),
    Fetch(String),
    Begin,
    Commit,
    Rollback,
}

#[derive(Debug)]
pub struct FakeDb {
    pub calls: Vec<Call>,
    tracking_table: String,
    /// Rows of the bookkeeping table; `None` while the table does not exist.
    pub history: Option<Vec<Row>>,
    /// Statements containing any of these fragments fail.
    pub failing: Vec<String>,
    /// Returned by every read instead of the bookkeeping rows.
    pub load_error: Option<DbError>,
}

impl Default for FakeDb {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDb {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            tracking_table: TRACKING_TABLE.to_string(),
            history: None,
            failing: Vec::new(),
            load_error: None,
        }
    }

    pub fn with_tracking_table(mut self, name: &str) -> Self {
        self.tracking_table = name.to_string();
        self
    }

    pub fn failing_on(mut self, fragment: &str) -> Self {
        self.failing.push(fragment.to_string());
        self
    }

    /// Every executed statement, in order.
    pub fn executed(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Execute(sql) => Some(sql.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Executed statements other than bookkeeping writes.
    pub fn ddl(&self) -> Vec<&str> {
        self.executed()
            .into_iter()
            .filter(|sql| !sql.contains(self.tracking_table.as_str()))
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn recorded_migrations(&self) -> usize {
        self.history.as_ref().map_or(0, Vec::len)
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn unknown_table(&self) -> DbError {
        DbError::with_code(
            format!("Table 'app.{}' doesn't exist", self.tracking_table),
            "42S02",
        )
    }
}

impl Db for FakeDb {
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, DbError> {
        self.calls.push(Call::Execute(sql.to_string()));

        if self.failing.iter().any(|fragment| sql.contains(fragment.as_str())) {
            return Err(DbError::with_code("simulated failure", "HY000"));
        }

        let table = self.tracking_table.clone();
        if sql.starts_with(&format!("create table if not exists {}(", table)) {
            self.history.get_or_insert_with(Vec::new);
        } else if sql.starts_with(&format!("insert into {}(", table)) {
            let missing = self.unknown_table();
            let history = self.history.as_mut().ok_or(missing)?;
            let mut row = Row::new();
            for (column, value) in ["host", "created_at", "tables"].iter().zip(params) {
                row.insert(column.to_string(), value.clone());
            }
            history.push(row);
        } else if sql == format!("drop table if exists {}", table) {
            self.history = None;
        }
        Ok(1)
    }

    async fn fetch_all(&mut self, sql: &str, _params: &[SqlValue]) -> Result<Vec<Row>, DbError> {
        self.calls.push(Call::Fetch(sql.to_string()));

        if let Some(e) = &self.load_error {
            return Err(e.clone());
        }
        let history = self.history.as_ref().ok_or_else(|| self.unknown_table())?;
        Ok(history.last().cloned().into_iter().collect())
    }

    async fn begin_transaction(&mut self) -> Result<(), DbError> {
        self.calls.push(Call::Begin);
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        self.calls.push(Call::Commit);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DbError> {
        self.calls.push(Call::Rollback);
        Ok(())
    }
}
