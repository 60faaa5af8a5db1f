//! Constraint clauses for `create table` bodies and `alter table` lists.

use crate::catalog::constraint::{Constraint, KeyKind};
use crate::render::{column_list, constraint_name};

fn name(table: &str, constraint: &Constraint) -> String {
    constraint_name(constraint.kind, table, &constraint.columns)
}

/// Constraint as it appears inside `create table (...)`.
pub fn render_constraint(table: &str, constraint: &Constraint) -> String {
    let columns = column_list(&constraint.columns);
    let mut sql = match constraint.kind {
        KeyKind::Unique => format!("constraint {} unique key ({})", name(table, constraint), columns),
        KeyKind::Primary => format!("constraint {} primary key ({})", name(table, constraint), columns),
        KeyKind::Foreign => format!("constraint {} foreign key ({})", name(table, constraint), columns),
    };

    if let Some(reference) = &constraint.reference {
        sql.push_str(&format!(
            " references {}({})",
            reference.table,
            column_list(&reference.columns)
        ));
        if let Some(action) = &reference.on_delete {
            sql.push_str(&format!(" on delete {}", action));
        }
        if let Some(action) = &reference.on_update {
            sql.push_str(&format!(" on update {}", action));
        }
    }

    sql
}

/// `add constraint ...` clause used when re-establishing keys after a column change.
pub fn render_add_constraint(table: &str, constraint: &Constraint) -> String {
    format!("add {}", render_constraint(table, constraint))
}

/// `drop ...` clause removing a constraint ahead of column changes.
///
/// The primary key of an auto_increment column cannot be dropped while the column exists
/// and is left in place.
pub fn render_drop_constraint(table: &str, constraint: &Constraint) -> Option<String> {
    match constraint.kind {
        KeyKind::Primary if constraint.auto_increment => None,
        KeyKind::Primary => Some("drop primary key".to_string()),
        KeyKind::Foreign => Some(format!("drop foreign key {}", name(table, constraint))),
        KeyKind::Unique => Some(format!("drop index {}", name(table, constraint))),
    }
}

/// Secondary index kept next to a composite primary key.
pub fn render_composite_primary_index(table: &str, constraint: &Constraint) -> Option<String> {
    (constraint.kind == KeyKind::Primary && constraint.composite).then(|| {
        format!(
            "index {} ({})",
            name(table, constraint),
            column_list(&constraint.columns)
        )
    })
}
