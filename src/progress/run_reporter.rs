use console::style;
use std::time::Duration;

use crate::diff::{Phase, Statement};

/// Operator-facing progress lines for a migrate/drop/reset run.
///
/// Independent of the log level; a silent reporter prints nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunReporter {
    enabled: bool,
    verbose: bool,
}

impl RunReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            enabled: true,
            verbose,
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn start(&self, program: &str, db_name: &str) {
        if self.enabled {
            println!(
                "\n> starting {} for {} database ...",
                program,
                style(format!("'{}'", db_name)).bold()
            );
        }
    }

    pub fn table(&self, name: &str, existing: bool, create_sql: Option<&str>) {
        if !self.enabled {
            return;
        }
        let name = style(format!("'{}'", name)).bold();
        if existing {
            println!("\n> processing existing table {}:", name);
        } else {
            println!("\n> creating new table {}:", name);
            if let Some(sql) = create_sql {
                println!("{}", style(sql).dim());
            }
        }
    }

    pub fn statement(&self, statement: &Statement) {
        if !self.enabled {
            return;
        }
        let event = match &statement.phase {
            Phase::AddColumn(c) => Some(("creating column", c)),
            Phase::ChangeColumn(c) => Some(("changing column", c)),
            Phase::DropColumn(c) => Some(("dropping column", c)),
            _ => None,
        };
        if let Some((action, column)) = event {
            println!("    ➤ {} {}", action, style(column).bold());
        }
        if self.verbose {
            println!("      {}", style(&statement.sql).dim());
        }
    }

    pub fn table_done(&self, ok: bool) {
        if !self.enabled {
            return;
        }
        if ok {
            println!("{} all ok", style("✓").green());
        } else {
            println!("{} some statements failed", style("✗").red());
        }
    }

    pub fn skipped(&self, name: &str) {
        if self.enabled && self.verbose {
            println!("\n> skipping inactive table {}", style(format!("'{}'", name)).bold());
        }
    }

    pub fn dropping(&self, names: &[&str]) {
        if !self.enabled {
            return;
        }
        println!("\n> dropping tables:");
        for name in names {
            println!("    ➤ {}", name);
        }
    }

    pub fn nothing_to_drop(&self) {
        if self.enabled {
            println!("\n{} all ok, nothing to drop", style("✓").green());
        }
    }

    pub fn done(&self, message: &str) {
        if self.enabled {
            println!("\n{} {}", style("✓").green(), message);
        }
    }

    pub fn failed(&self, message: &str) {
        if self.enabled {
            println!("\n{} {}", style("!").red().bold(), message);
        }
    }

    pub fn summary(&self, program: &str, ok: bool, duration: Duration) {
        if !self.enabled {
            return;
        }
        let duration_str = format_duration(duration);
        if ok {
            println!(
                "{} {} completed in {}",
                style("✓").green(),
                program,
                style(&duration_str).green()
            );
        } else {
            println!(
                "{} {} failed after {}",
                style("✗").red(),
                program,
                style(&duration_str).red()
            );
        }
    }
}

fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let millis = d.subsec_millis();

    if total_secs == 0 {
        format!("{}ms", millis)
    } else if total_secs < 60 {
        if millis > 0 {
            format!("{}.{}s", total_secs, millis / 100)
        } else {
            format!("{}s", total_secs)
        }
    } else {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        if secs > 0 {
            format!("{}m{}s", mins, secs)
        } else {
            format!("{}m", mins)
        }
    }
}
