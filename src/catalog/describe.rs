//! Compact column description syntax, one column per line:
//!
//! ```text
//! id: id
//! email* U: string(128)
//! user_id* -> users::id(cascade, no action): uint
//! tenant_id P+: uint
//! slug P;: string = 'draft'
//! timestamps: timestamps
//! ```
//!
//! `*` marks the column not null. `->` declares a foreign key; the referenced column defaults
//! to `id` and both actions default to `no action`. `P`/`U` declare a primary/unique key;
//! a `+` suffix opens (or continues) a composite chain and `;` closes it.
use regex::Regex;
use std::sync::LazyLock;

use super::table::Table;
use crate::error::DeclarationError;

static LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        ^\s*(?<name>\w*)(?<required>\*)?\s*
        (?:->\s*(?<ref_table>\w+)(?:::(?<ref_column>\w+))?
            (?:\(\s*(?<on_delete>[\w\ ]+?)\s*(?:,\s*(?<on_update>[\w\ ]+?)\s*)?\))?
        )?
        (?:\s+(?<key_mod>[PU])(?<key_comp>[+;])?)?
        \s*:\s*(?<type>\w+)
        (?:\((?<size>\d+(?:\s*,\s*\d+)?)\))?
        (?:\s*=\s*(?<default>"[^"]*"|'[^']*'|-?\d+(?:\.\d+)?|[\w()]+(?:\s+[\w()]+)*))?
        \s*[,;]?\s*$"#,
    )
    .expect("column description pattern is valid")
});

const DEFAULT_REFERENCED_COLUMN: &str = "id";
const DEFAULT_ACTION: &str = "no action";

/// Parse `description` line by line and append the resulting columns to `table`.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn apply(table: &mut Table, description: &str) -> Result<(), DeclarationError> {
    for (number, raw) in description.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        apply_line(table, line, number + 1)?;
    }
    Ok(())
}

fn apply_line(table: &mut Table, line: &str, number: usize) -> Result<(), DeclarationError> {
    let table_name = table.name().to_string();
    let invalid = || DeclarationError::InvalidDescription {
        table: table_name.clone(),
        line: number,
    };
    let caps = LINE.captures(line).ok_or_else(invalid)?;

    let name = caps.name("name").map_or("", |m| m.as_str());
    let type_name = caps.name("type").map_or("", |m| m.as_str()).to_lowercase();
    let size = caps
        .name("size")
        .map(|m| m.as_str().split(',').map(str::trim).collect::<Vec<_>>());
    let first_size = size
        .as_ref()
        .and_then(|parts| parts.first())
        .and_then(|s| s.parse::<u32>().ok());

    match type_name.as_str() {
        "id" => {
            let name = if name.is_empty() { "id" } else { name };
            table.id(name, first_size.unwrap_or(16));
            return Ok(());
        }
        "timestamps" => {
            table.timestamps();
            return Ok(());
        }
        _ => {}
    }

    if name.is_empty() {
        return Err(invalid());
    }

    let column = match type_name.as_str() {
        "string" | "varchar" => table.string(name, 255),
        "int" | "integer" => table.integer(name, 16),
        "uint" => table.uint(name, 16),
        "decimal" => table.decimal(name, 11, 2),
        "bool" | "boolean" => table.bool(name),
        "timestamp" => table.timestamp(name),
        "json" => table.json(name),
        "text" => table.text(name),
        "blob" => table.blob(name),
        _ => {
            return Err(DeclarationError::UnknownType {
                table: table_name,
                line: number,
                type_name,
            });
        }
    };

    if let Some(parts) = &size {
        column.size(parts.join(", "));
    }
    if caps.name("required").is_some() {
        column.not_nullable();
    }
    if let Some(default) = caps.name("default") {
        column.default(default.as_str().trim());
    }

    let composite = caps.name("key_comp").map(|m| m.as_str() == ";");

    if let Some(ref_table) = caps.name("ref_table") {
        let ref_column = caps
            .name("ref_column")
            .map_or(DEFAULT_REFERENCED_COLUMN, |m| m.as_str());
        let on_delete = caps
            .name("on_delete")
            .map_or(DEFAULT_ACTION, |m| m.as_str());
        let on_update = caps
            .name("on_update")
            .map_or(DEFAULT_ACTION, |m| m.as_str());
        column.references(ref_table.as_str(), ref_column, Some(on_delete), Some(on_update));
    }

    match (caps.name("key_mod").map(|m| m.as_str()), composite) {
        (Some("P"), None) => {
            column.primary();
        }
        (Some("P"), Some(close_chain)) => {
            column.primary_composite(close_chain);
        }
        (Some("U"), None) => {
            column.unique();
        }
        (Some("U"), Some(close_chain)) => {
            column.unique_composite(close_chain);
        }
        _ => {}
    }

    Ok(())
}
