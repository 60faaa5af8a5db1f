use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use tracing::info;

use crate::catalog::Table;
use crate::config::Config;
use crate::db::connection::mask_url_password;
use crate::db::{Db, DryRunDb, MySqlDb};
use crate::migration::{Migration, Program};
use crate::progress::RunReporter;
use crate::prompts::confirm_destructive;
use crate::schema_loader::load_schema_file;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Print statements instead of executing them; reads still hit the database
    pub dry_run: bool,
    /// Skip the confirmation asked before drop/reset
    pub assume_yes: bool,
    pub verbose: bool,
}

/// Run `program` against the configured database. Returns the program status.
pub async fn cmd_run(
    config: &Config,
    root_dir: &Path,
    program: Program,
    options: &RunOptions,
) -> Result<bool> {
    let tables = match program {
        Program::Drop => Vec::new(),
        Program::Migrate | Program::Reset => {
            load_schema_file(&root_dir.join(&config.schema.file))?
        }
    };

    if program.is_destructive()
        && !options.dry_run
        && !options.assume_yes
        && !confirm_destructive(program, &config.database.name)?
    {
        println!("Aborted");
        return Ok(false);
    }

    let url = config.database.require_url()?;
    info!(
        "Running {} on {} ({})",
        program,
        config.database.name,
        mask_url_password(url)
    );
    let db = MySqlDb::connect(url)
        .await
        .with_context(|| format!("Failed to connect to '{}'", config.database.name))?;

    if options.dry_run {
        let mut dry = DryRunDb::new(db);
        let ok = execute(&mut dry, config, tables, program, options).await;
        print_dry_run(dry.statements());
        Ok(ok)
    } else {
        Ok(execute(db, config, tables, program, options).await)
    }
}

async fn execute<D: Db>(
    db: D,
    config: &Config,
    tables: Vec<Table>,
    program: Program,
    options: &RunOptions,
) -> bool {
    let mut migration = Migration::new(db, &config.database.name, tables)
        .with_host(&config.migration.host)
        .with_tracking_table(&config.migration.tracking_table)
        .with_reporter(RunReporter::new(options.verbose));
    migration.run_program(program).await
}

fn print_dry_run(statements: &[String]) {
    println!();
    if statements.is_empty() {
        println!("{}", style("Dry run: no statements would be executed").dim());
        return;
    }
    println!(
        "{}",
        style(format!(
            "Dry run: {} statement{} would be executed",
            statements.len(),
            if statements.len() == 1 { "" } else { "s" }
        ))
        .bold()
    );
    for statement in statements {
        println!("{};", statement.trim_end_matches(';'));
    }
}
