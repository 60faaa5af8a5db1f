//! `create table` rendering.

use super::constraint::{render_composite_primary_index, render_constraint};
use crate::catalog::constraint::Constraint;
use crate::catalog::table::Table;

/// Render the full `create table` statement: column declarations first, then every
/// constraint in column order, one definition per line.
pub fn render_create_table(table: &Table, constraints: &[Constraint]) -> String {
    let mut definitions: Vec<String> = table.columns().iter().map(|c| c.declaration()).collect();

    for constraint in constraints {
        definitions.push(render_constraint(table.name(), constraint));
        if let Some(index) = render_composite_primary_index(table.name(), constraint) {
            definitions.push(index);
        }
    }

    format!(
        "create table {}{}(\n\t{}\n);",
        if table.ignore_if_exists() { "if not exists " } else { "" },
        table.name(),
        definitions.join(",\n\t")
    )
}
