use anyhow::{Context, Result};
use console::style;
use itertools::Itertools;
use std::path::Path;

use crate::config::Config;
use crate::diff::compute_dependencies;
use crate::migration::tracking::ensure_not_declared;
use crate::schema_loader::load_schema_file;

/// Validate the schema file offline and print the order tables would be migrated in.
pub fn cmd_check(config: &Config, root_dir: &Path, verbose: bool) -> Result<()> {
    let path = root_dir.join(&config.schema.file);
    let mut tables = load_schema_file(&path)?;
    ensure_not_declared(&tables, &config.migration.tracking_table)
        .with_context(|| format!("Invalid schema file {}", path.display()))?;

    let ordered = compute_dependencies(&tables).context("Cannot order tables")?;

    println!(
        "{} {} table{} in {}",
        style("✓").green(),
        ordered.len(),
        if ordered.len() == 1 { "" } else { "s" },
        path.display()
    );

    for table in tables.iter_mut() {
        table.generate_dependencies();
    }

    for (position, table) in ordered.iter().enumerate() {
        let inactive = if table.active() { "" } else { " (inactive)" };
        let references = tables
            .iter()
            .find(|t| t.name() == table.name())
            .map(|t| t.dependencies().iter().join(", "))
            .filter(|deps| !deps.is_empty())
            .map(|deps| format!(" -> {}", deps))
            .unwrap_or_default();
        println!("  {}. {}{}{}", position + 1, table.name(), references, inactive);
        if verbose {
            println!("{}", style(table.create_query()?).dim());
        }
    }
    Ok(())
}
