use anyhow::{Result, anyhow};
use dialoguer::Confirm;
use std::io::IsTerminal;

use crate::migration::Program;

/// Ask before running a program that drops tables.
///
/// Without a terminal to ask on, the run is refused unless `--yes` was given.
pub fn confirm_destructive(program: Program, db_name: &str) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Err(anyhow!(
            "'{}' drops tables in '{}'; pass --yes to run it non-interactively",
            program,
            db_name
        ));
    }

    let confirmed = Confirm::new()
        .with_prompt(format!(
            "'{}' will drop every recorded table in '{}'. Continue?",
            program, db_name
        ))
        .default(false)
        .interact()?;

    Ok(confirmed)
}
