//! Whole-schema orchestration: order the declared tables, diff them against the last
//! recorded snapshot, converge the database and record the new snapshot.
//!
//! MySQL commits DDL implicitly, so the transaction opened around a run is best effort:
//! on failure only the bookkeeping write is reliably undone and tables may be left
//! partially migrated. Every statement is logged with its table and phase so the actual
//! state can be reconstructed.
pub mod tracking;

use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::catalog::{self, Table};
use crate::constants::{DEFAULT_HOST, DEFAULT_TRACKING_TABLE, NON_ATOMIC_DDL_NOTICE};
use crate::db::Db;
use crate::diff::{Phase, compute_dependencies};
use crate::error::DeclarationError;
use crate::progress::RunReporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    Migrate,
    Drop,
    Reset,
}

impl Program {
    /// Programs that remove tables or data.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Program::Drop | Program::Reset)
    }
}

impl FromStr for Program {
    type Err = DeclarationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "migrate" => Ok(Program::Migrate),
            "drop" => Ok(Program::Drop),
            "reset" => Ok(Program::Reset),
            other => Err(DeclarationError::UnsupportedProgram(other.to_string())),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Program::Migrate => f.write_str("migrate"),
            Program::Drop => f.write_str("drop"),
            Program::Reset => f.write_str("reset"),
        }
    }
}

/// One migration run context: a database handle, its declared tables and where history is kept.
///
/// The handle is owned exclusively for the duration of the run. Concurrent runs against the
/// same schema are not guarded against.
pub struct Migration<D: Db> {
    db: D,
    db_name: String,
    host: String,
    tracking_table: String,
    tables: Vec<Table>,
    reporter: RunReporter,
}

impl<D: Db> Migration<D> {
    pub fn new(db: D, db_name: &str, tables: Vec<Table>) -> Self {
        let mut migration = Self {
            db,
            db_name: db_name.to_string(),
            host: DEFAULT_HOST.to_string(),
            tracking_table: DEFAULT_TRACKING_TABLE.to_string(),
            tables: Vec::new(),
            reporter: RunReporter::silent(),
        };
        for table in tables {
            migration.register(table);
        }
        migration
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn with_tracking_table(mut self, name: &str) -> Self {
        self.tracking_table = name.to_string();
        self
    }

    pub fn with_reporter(mut self, reporter: RunReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Add a table to the declared set.
    pub fn register(&mut self, mut table: Table) -> &mut Self {
        table.generate_dependencies();
        self.tables.push(table);
        self
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn db(&self) -> &D {
        &self.db
    }

    pub fn into_db(self) -> D {
        self.db
    }

    /// Run a program by name. Unknown names fail without touching the database.
    pub async fn run(&mut self, program: &str) -> bool {
        match program.parse::<Program>() {
            Ok(program) => self.run_program(program).await,
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }

    pub async fn run_program(&mut self, program: Program) -> bool {
        let started = Instant::now();
        let ok = match program {
            Program::Migrate => self.migrate().await,
            Program::Drop => self.drop().await,
            Program::Reset => {
                let dropped = self.drop().await;
                if !dropped {
                    warn!(db = %self.db_name, "drop failed; reset continues with migrate");
                }
                let migrated = self.migrate().await;
                dropped & migrated
            }
        };
        self.reporter
            .summary(&program.to_string(), ok, started.elapsed());
        ok
    }

    /// Converge the database to the declared tables and record the result.
    pub async fn migrate(&mut self) -> bool {
        self.reporter.start("migration", &self.db_name);

        let declared = catalog::validate_tables(&self.tables)
            .and_then(|()| tracking::ensure_not_declared(&self.tables, &self.tracking_table));
        if let Err(e) = declared {
            error!(db = %self.db_name, phase = "validate", "{}", e);
            self.reporter.failed(&e.to_string());
            return false;
        }

        let new_tables = match compute_dependencies(&self.tables) {
            Ok(tables) => tables,
            Err(e) => {
                error!(
                    db = %self.db_name,
                    phase = "order",
                    cycles = ?e.cycles,
                    missing = ?e.missing,
                    "{}",
                    e
                );
                self.reporter.failed(&e.to_string());
                return false;
            }
        };

        let old_tables = match tracking::last_tables(&mut self.db, &self.tracking_table).await {
            Ok(tables) => tables,
            Err(e) => {
                error!(db = %self.db_name, phase = "load snapshot", "{}", e);
                self.reporter.failed(&e.to_string());
                return false;
            }
        };

        warn!(db = %self.db_name, "{}", NON_ATOMIC_DDL_NOTICE);
        if let Err(e) = self.db.begin_transaction().await {
            error!(db = %self.db_name, phase = "begin", "{}", e);
            return false;
        }

        let mut status = true;
        for table in &new_tables {
            if !table.active() {
                info!(table = table.name(), "inactive, skipped");
                self.reporter.skipped(table.name());
                continue;
            }

            let old = old_tables.iter().find(|t| t.name() == table.name());
            let ok = match table.migration_plan(old) {
                Ok(plan) => {
                    let create_sql = plan
                        .iter()
                        .find(|s| s.phase == Phase::Create)
                        .map(|s| s.sql.as_str());
                    self.reporter.table(table.name(), old.is_some(), create_sql);
                    for statement in &plan {
                        self.reporter.statement(statement);
                    }
                    table.execute_plan(&mut self.db, &plan).await
                }
                Err(e) => {
                    error!(table = table.name(), phase = "plan", "{}", e);
                    false
                }
            };

            if ok {
                info!(table = table.name(), "migrated");
            } else {
                error!(table = table.name(), "migration failed");
            }
            self.reporter.table_done(ok);
            status &= ok;
        }

        // children before the tables they reference
        let old_order = compute_dependencies(&old_tables).unwrap_or_else(|_| old_tables.clone());
        let dropped: Vec<&str> = old_order
            .iter()
            .rev()
            .map(|t| t.name())
            .filter(|name| !new_tables.iter().any(|t| t.name() == *name))
            .collect();
        if !dropped.is_empty() {
            self.reporter.dropping(&dropped);
            let sql = format!("drop table if exists {}", dropped.join(", "));
            if let Err(e) = self.db.execute(&sql, &[]).await {
                error!(phase = "drop tables", tables = ?dropped, "{}", e);
                status = false;
            }
        }

        if !status {
            self.rollback("migration failed; reverting changes").await;
            return false;
        }

        if let Err(e) =
            tracking::save_migration(&mut self.db, &self.tracking_table, &self.host, &new_tables).await
        {
            error!(db = %self.db_name, phase = "save snapshot", "{}", e);
            self.rollback("error while saving migration; reverting changes").await;
            return false;
        }

        match self.db.commit().await {
            Ok(()) => {
                self.reporter.done("migration saved");
                true
            }
            Err(e) => {
                error!(db = %self.db_name, phase = "commit", "{}", e);
                false
            }
        }
    }

    /// Drop every table of the last recorded snapshot, then the bookkeeping table.
    pub async fn drop(&mut self) -> bool {
        self.reporter.start("drop", &self.db_name);

        let tables = match tracking::last_tables(&mut self.db, &self.tracking_table).await {
            Ok(tables) => tables,
            Err(e) => {
                error!(db = %self.db_name, phase = "load snapshot", "{}", e);
                self.reporter.failed(&e.to_string());
                return false;
            }
        };

        if tables.is_empty() {
            self.reporter.nothing_to_drop();
            return true;
        }

        let ordered = match compute_dependencies(&tables) {
            Ok(ordered) => ordered,
            Err(e) => {
                error!(db = %self.db_name, phase = "order", "{}", e);
                self.reporter.failed(&e.to_string());
                return false;
            }
        };
        let names: Vec<&str> = ordered.iter().rev().map(|t| t.name()).collect();
        self.reporter.dropping(&names);

        warn!(db = %self.db_name, "{}", NON_ATOMIC_DDL_NOTICE);
        if let Err(e) = self.db.begin_transaction().await {
            error!(db = %self.db_name, phase = "begin", "{}", e);
            return false;
        }

        let sql = format!("drop table if exists {}", names.join(", "));
        if let Err(e) = self.db.execute(&sql, &[]).await {
            error!(phase = "drop tables", tables = ?names, "{}", e);
            self.rollback("something went wrong ...").await;
            return false;
        }

        if let Err(e) = tracking::drop_tracking_table(&mut self.db, &self.tracking_table).await {
            error!(db = %self.db_name, phase = "drop bookkeeping", "{}", e);
            self.rollback("could not drop migration table; reverting all changes").await;
            return false;
        }

        match self.db.commit().await {
            Ok(()) => {
                self.reporter.done("tables dropped");
                true
            }
            Err(e) => {
                error!(db = %self.db_name, phase = "commit", "{}", e);
                false
            }
        }
    }

    async fn rollback(&mut self, reason: &str) {
        self.reporter.failed(reason);
        if let Err(e) = self.db.rollback().await {
            error!(db = %self.db_name, phase = "rollback", "{}", e);
        }
    }
}
