//! Naming and identifier rules shared by every statement renderer.
pub mod sql;

use crate::catalog::constraint::KeyKind;
use crate::error::DeclarationError;

/// Identifiers are emitted unquoted, so only plain names are accepted: letters, digits,
/// underscores and `$`, starting with a letter or underscore.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

pub fn validate_identifier(name: &str) -> Result<(), DeclarationError> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(DeclarationError::InvalidIdentifier(name.to_string()))
    }
}

/// `FK_<table>_<col>[_<col>...]`, `PK_...` or `UK_...`
pub fn constraint_name(kind: KeyKind, table: &str, columns: &[String]) -> String {
    format!("{}_{}_{}", kind.prefix(), table, columns.join("_"))
}

pub fn column_list(columns: &[String]) -> String {
    columns.join(", ")
}
