//! Declared tables: ordered columns, typed column helpers, dependency bookkeeping
//! and the create/migrate/drop entry points.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::{error, info};

use super::column::{Column, ColumnType};
use super::constraint;
use super::describe;
use crate::db::Db;
use crate::diff::{self, Phase, Statement};
use crate::error::DeclarationError;
use crate::render::{self, validate_identifier};

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    name: String,
    #[serde(default)]
    columns: Vec<Column>,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    ignore_if_exists: bool,
    /// Tables this one still waits on during ordering. Rebuilt on demand, never persisted.
    #[serde(skip)]
    dependencies: BTreeSet<String>,
}

impl Table {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            active: true,
            ignore_if_exists: false,
            dependencies: BTreeSet::new(),
        }
    }

    /// Table whose create statement tolerates an existing table.
    pub fn if_not_exists(name: &str) -> Self {
        let mut table = Self::new(name);
        table.ignore_if_exists = true;
        table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) -> &mut Self {
        self.active = active;
        self
    }

    pub fn ignore_if_exists(&self) -> bool {
        self.ignore_if_exists
    }

    pub fn set_ignore_if_exists(&mut self, ignore: bool) -> &mut Self {
        self.ignore_if_exists = ignore;
        self
    }

    /// Append a column and hand it back for further configuration.
    pub fn add(&mut self, column: Column) -> &mut Column {
        let index = self.columns.len();
        self.columns.push(column);
        &mut self.columns[index]
    }

    fn push(&mut self, name: &str, column_type: ColumnType) -> &mut Column {
        self.add(Column::new(name, column_type))
    }

    /// `int(size) unsigned auto_increment primary`
    pub fn id(&mut self, name: &str, size: u32) -> &mut Column {
        self.push(name, ColumnType::Int)
            .size(size)
            .unsigned()
            .auto_increment()
            .primary()
    }

    /// `created_at` plus `updated_at`, the latter refreshed on every update.
    pub fn timestamps(&mut self) -> &mut Self {
        self.timestamp("created_at");
        self.timestamp("updated_at").on_update("current_timestamp");
        self
    }

    pub fn string(&mut self, name: &str, size: u32) -> &mut Column {
        self.push(name, ColumnType::Varchar).size(size)
    }

    pub fn integer(&mut self, name: &str, size: u32) -> &mut Column {
        self.push(name, ColumnType::Int).size(size)
    }

    pub fn uint(&mut self, name: &str, size: u32) -> &mut Column {
        self.integer(name, size).unsigned()
    }

    /// `decimal(size, precision)`
    pub fn decimal(&mut self, name: &str, size: u32, precision: u32) -> &mut Column {
        self.push(name, ColumnType::Decimal)
            .size(format!("{}, {}", size, precision))
    }

    pub fn bool(&mut self, name: &str) -> &mut Column {
        self.push(name, ColumnType::Bool)
    }

    /// Timestamp defaulting to the insertion time.
    pub fn timestamp(&mut self, name: &str) -> &mut Column {
        self.push(name, ColumnType::Timestamp)
            .default("current_timestamp")
    }

    pub fn json(&mut self, name: &str) -> &mut Column {
        self.push(name, ColumnType::Json)
    }

    pub fn text(&mut self, name: &str) -> &mut Column {
        self.push(name, ColumnType::Text)
    }

    pub fn blob(&mut self, name: &str) -> &mut Column {
        self.push(name, ColumnType::Blob)
    }

    /// Append columns from the compact line-oriented description syntax.
    pub fn generate(&mut self, description: &str) -> Result<&mut Self, DeclarationError> {
        describe::apply(self, description)?;
        Ok(self)
    }

    /// Rebuild the referenced-table set from the current columns.
    ///
    /// Self references never count. A composite foreign key counts once, through the
    /// column that closes its chain.
    pub fn generate_dependencies(&mut self) -> &BTreeSet<String> {
        let referenced = self.columns.iter().flat_map(|column| {
            let p = column.properties();
            let single = p.foreign.as_ref().map(|fk| fk.table.as_str());
            let composite = p
                .foreign_composite
                .as_ref()
                .filter(|fk| fk.close_chain)
                .map(|fk| fk.reference.table.as_str());
            single.into_iter().chain(composite)
        });

        self.dependencies = referenced
            .filter(|table| *table != self.name)
            .map(str::to_string)
            .collect();
        &self.dependencies
    }

    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.dependencies
    }

    /// Whether any dependency is still outstanding.
    pub fn dependent(&self) -> bool {
        !self.dependencies.is_empty()
    }

    pub fn remove_dependency(&mut self, table: &str) -> &mut Self {
        self.dependencies.remove(table);
        self
    }

    /// Identifiers, duplicate columns and key chains.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        validate_identifier(&self.name)?;

        let mut seen = HashSet::new();
        for column in &self.columns {
            validate_identifier(column.name())?;
            if !seen.insert(column.name()) {
                return Err(DeclarationError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name().to_string(),
                });
            }

            let p = column.properties();
            if let Some(fk) = &p.foreign {
                validate_identifier(&fk.table)?;
                validate_identifier(&fk.column)?;
            }
            if let Some(fk) = &p.foreign_composite {
                validate_identifier(&fk.reference.table)?;
                validate_identifier(&fk.reference.column)?;
            }
        }

        constraint::collect(&self.name, &self.columns).map(|_| ())
    }

    /// Full `create table` statement with inline constraints.
    pub fn create_query(&self) -> Result<String, DeclarationError> {
        let constraints = constraint::collect(&self.name, &self.columns)?;
        Ok(render::sql::render_create_table(self, &constraints))
    }

    /// Statements that converge `old` (the last recorded shape) to this table.
    pub fn migration_plan(&self, old: Option<&Table>) -> Result<Vec<Statement>, DeclarationError> {
        diff::plan_table(old, self)
    }

    /// Converge the live table from `old` to this declaration.
    ///
    /// Statements run in order even after a failure; the result is false if any failed.
    /// Only declaration errors stop the table before anything is executed.
    pub async fn migrate<D: Db>(
        &self,
        db: &mut D,
        old: Option<&Table>,
    ) -> Result<bool, DeclarationError> {
        let plan = self.migration_plan(old)?;
        Ok(self.execute_plan(db, &plan).await)
    }

    pub async fn execute_plan<D: Db>(&self, db: &mut D, plan: &[Statement]) -> bool {
        let mut status = true;
        for statement in plan {
            status &= self.run(db, statement).await;
        }
        status
    }

    pub async fn create<D: Db>(&self, db: &mut D) -> bool {
        match self.create_query() {
            Ok(sql) => self.run(db, &Statement::new(Phase::Create, sql)).await,
            Err(e) => {
                error!(table = %self.name, "{}", e);
                false
            }
        }
    }

    pub async fn drop<D: Db>(&self, db: &mut D) -> bool {
        let sql = format!("drop table if exists {}", self.name);
        self.run(db, &Statement::new(Phase::DropTable, sql)).await
    }

    async fn run<D: Db>(&self, db: &mut D, statement: &Statement) -> bool {
        info!(table = %self.name, phase = %statement.phase, sql = %statement.sql, "executing");
        match db.execute(&statement.sql, &[]).await {
            Ok(_) => true,
            Err(e) => {
                error!(
                    table = %self.name,
                    phase = %statement.phase,
                    code = e.code.as_deref().unwrap_or("-"),
                    "{}: {}",
                    e,
                    statement.sql
                );
                false
            }
        }
    }
}
