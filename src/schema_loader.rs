//! Reads the declared tables from a YAML schema file.
//!
//! ```yaml
//! tables:
//!   - name: users
//!     description: |
//!       id: id
//!       email* U: string(128)
//!   - name: audit_log
//!     active: false
//!     columns:
//!       - { name: payload, type: json }
//! ```
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::catalog::{Column, Table, validate_tables};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    #[serde(default)]
    tables: Vec<TableEntry>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableEntry {
    name: String,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    ignore_if_exists: bool,
    /// Columns in the compact description syntax, appended first.
    #[serde(default)]
    description: Option<String>,
    /// Structured columns, appended after the description.
    #[serde(default)]
    columns: Vec<Column>,
}

impl TableEntry {
    fn into_table(self) -> Result<Table> {
        let mut table = Table::new(&self.name);
        table
            .set_active(self.active)
            .set_ignore_if_exists(self.ignore_if_exists);

        if let Some(description) = &self.description {
            table
                .generate(description)
                .with_context(|| format!("Invalid description for table '{}'", self.name))?;
        }
        for column in self.columns {
            table.add(column);
        }
        Ok(table)
    }
}

/// Parse schema YAML into validated tables, in declaration order.
pub fn parse_schema(contents: &str) -> Result<Vec<Table>> {
    let file: SchemaFile = serde_yaml::from_str(contents).context("Failed to parse schema")?;

    let tables = file
        .tables
        .into_iter()
        .map(TableEntry::into_table)
        .collect::<Result<Vec<_>>>()?;

    validate_tables(&tables)?;
    debug!(tables = tables.len(), "loaded schema");
    Ok(tables)
}

pub fn load_schema_file(path: &Path) -> Result<Vec<Table>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file {}", path.display()))?;
    parse_schema(&contents).with_context(|| format!("Invalid schema file {}", path.display()))
}
