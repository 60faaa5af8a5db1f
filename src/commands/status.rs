use anyhow::{Context, Result};
use console::style;

use crate::config::Config;
use crate::db::MySqlDb;
use crate::migration::tracking::last_migration;

/// Print the last recorded migration.
pub async fn cmd_status(config: &Config) -> Result<()> {
    let url = config.database.require_url()?;
    let mut db = MySqlDb::connect(url)
        .await
        .with_context(|| format!("Failed to connect to '{}'", config.database.name))?;

    let record = last_migration(&mut db, &config.migration.tracking_table)
        .await
        .context("Failed to read migration history")?;

    let Some(record) = record else {
        println!("No migration has been recorded in '{}'", config.database.name);
        return Ok(());
    };

    println!(
        "Last migration of {}: host {} at {}",
        style(&config.database.name).bold(),
        style(&record.host).bold(),
        record.created_at.as_deref().unwrap_or("unknown time")
    );
    if record.snapshot.tables.is_empty() {
        println!("  (no tables)");
    }
    for table in &record.snapshot.tables {
        let marker = if table.active() {
            style("✓").green()
        } else {
            style("-").dim()
        };
        println!(
            "  {} {} ({} column{})",
            marker,
            table.name(),
            table.columns().len(),
            if table.columns().len() == 1 { "" } else { "s" }
        );
    }
    Ok(())
}
