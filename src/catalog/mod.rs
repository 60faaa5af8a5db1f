//! Declarative schema model: columns, tables, derived key constraints and the stored snapshot.
pub mod column;
pub mod constraint;
pub mod describe;
pub mod snapshot;
pub mod table;

pub use column::{Column, ColumnType};
pub use snapshot::Snapshot;
pub use table::Table;

use crate::error::DeclarationError;
use std::collections::HashSet;

/// Validate every table and reject duplicate table names.
pub fn validate_tables(tables: &[Table]) -> Result<(), DeclarationError> {
    let mut seen = HashSet::new();
    for table in tables {
        if !seen.insert(table.name()) {
            return Err(DeclarationError::DuplicateTable(table.name().to_string()));
        }
        table.validate()?;
    }
    Ok(())
}
