//! Per-table migration planning and dependency ordering.
//!
//! A changed table is converged with a fixed sequence: drop every recorded constraint,
//! add or change each declared column and re-add its constraints, then drop the columns
//! that are no longer declared. A table that is structurally identical to its snapshot
//! produces no statements at all.
pub mod columns;
pub mod order;

pub use order::compute_dependencies;

use std::fmt;

use crate::catalog::constraint::{self, Constraint, KeyKind};
use crate::catalog::table::Table;
use crate::error::DeclarationError;
use crate::render::sql::{render_add_constraint, render_create_table, render_drop_constraint};
use columns::ColumnDiff;

/// Step of a table migration, carried for logging and progress output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Create,
    DropConstraints,
    AddColumn(String),
    ChangeColumn(String),
    AddConstraints(String),
    DropColumn(String),
    DropTable,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Create => write!(f, "create table"),
            Phase::DropConstraints => write!(f, "drop constraints"),
            Phase::AddColumn(c) => write!(f, "add column {}", c),
            Phase::ChangeColumn(c) => write!(f, "change column {}", c),
            Phase::AddConstraints(c) => write!(f, "add constraints for {}", c),
            Phase::DropColumn(c) => write!(f, "drop column {}", c),
            Phase::DropTable => write!(f, "drop table"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub phase: Phase,
    pub sql: String,
}

impl Statement {
    pub fn new(phase: Phase, sql: String) -> Self {
        Self { phase, sql }
    }
}

/// Same columns, same order, same structure.
pub fn is_identical(old: &Table, new: &Table) -> bool {
    old.columns().len() == new.columns().len()
        && old
            .columns()
            .iter()
            .zip(new.columns())
            .all(|(o, n)| o.name() == n.name() && o.equals(n))
}

/// Statements converging `old` (the recorded shape, if any) to `new`.
pub fn plan_table(old: Option<&Table>, new: &Table) -> Result<Vec<Statement>, DeclarationError> {
    let new_constraints = constraint::collect(new.name(), new.columns())?;

    let Some(old) = old else {
        let sql = render_create_table(new, &new_constraints);
        return Ok(vec![Statement::new(Phase::Create, sql)]);
    };

    if old.name() != new.name() {
        return Err(DeclarationError::NameMismatch {
            expected: old.name().to_string(),
            found: new.name().to_string(),
        });
    }

    if is_identical(old, new) {
        return Ok(Vec::new());
    }

    let old_constraints = constraint::collect(old.name(), old.columns())?;
    let table = new.name();
    let mut statements = Vec::new();

    let drops: Vec<String> = old_constraints
        .iter()
        .filter_map(|c| render_drop_constraint(table, c))
        .collect();
    if !drops.is_empty() {
        statements.push(Statement::new(
            Phase::DropConstraints,
            format!("alter table {} {}", table, drops.join(", ")),
        ));
    }

    for (index, column) in new.columns().iter().enumerate() {
        let previous = old.column(column.name());

        match columns::diff(previous, Some(column)) {
            ColumnDiff::Added(added) => {
                let mut sql = format!("alter table {} add column {}", table, added.declaration());
                if added.is_auto_increment_primary() {
                    sql.push_str(" primary key");
                }
                statements.push(Statement::new(Phase::AddColumn(added.name().to_string()), sql));
            }
            ColumnDiff::Changed { old: before, new: after } => {
                let mut sql = format!(
                    "alter table {} change {} {}",
                    table,
                    after.name(),
                    after.declaration()
                );
                if after.is_auto_increment_primary() && !before.is_auto_increment_primary() {
                    sql.push_str(" primary key");
                } else if before.is_auto_increment_primary() && !after.properties().primary {
                    sql.push_str(", drop primary key");
                }
                statements.push(Statement::new(
                    Phase::ChangeColumn(after.name().to_string()),
                    sql,
                ));
            }
            _ => {}
        }

        let kept_primary = previous.is_some_and(|p| p.is_auto_increment_primary());
        let adds: Vec<String> = new_constraints
            .iter()
            .filter(|c| c.closed_at == index && needs_add(c, kept_primary))
            .map(|c| render_add_constraint(table, c))
            .collect();
        if !adds.is_empty() {
            statements.push(Statement::new(
                Phase::AddConstraints(column.name().to_string()),
                format!("alter table {} {}", table, adds.join(", ")),
            ));
        }
    }

    for column in old.columns() {
        if let ColumnDiff::Dropped(dropped) = columns::diff(Some(column), new.column(column.name())) {
            statements.push(Statement::new(
                Phase::DropColumn(dropped.name().to_string()),
                format!("alter table {} drop column {}", table, dropped.name()),
            ));
        }
    }

    Ok(statements)
}

/// Single-column primary keys survive the drop phase when the previous column was an
/// auto_increment primary, and are established inline for auto_increment columns.
fn needs_add(constraint: &Constraint, kept_primary: bool) -> bool {
    match constraint.kind {
        KeyKind::Primary if !constraint.composite => !constraint.auto_increment && !kept_primary,
        _ => true,
    }
}
