//! Key constraints derived from column properties.
//!
//! Non-composite keys map one column to one constraint. Composite keys are built from a run
//! of adjacent columns carrying the same composite property; the column whose marker closes
//! the chain completes the constraint. Every consumer (create, drop, re-add) goes through
//! [`collect`] so that grouping and naming cannot drift apart.

use super::column::Column;
use crate::error::DeclarationError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyKind {
    Foreign,
    Primary,
    Unique,
}

impl KeyKind {
    pub const ALL: [KeyKind; 3] = [KeyKind::Foreign, KeyKind::Primary, KeyKind::Unique];

    /// Prefix of the generated constraint name.
    pub fn prefix(&self) -> &'static str {
        match self {
            KeyKind::Foreign => "FK",
            KeyKind::Primary => "PK",
            KeyKind::Unique => "UK",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Foreign => f.write_str("foreign"),
            KeyKind::Primary => f.write_str("primary"),
            KeyKind::Unique => f.write_str("unique"),
        }
    }
}

/// Referenced side of a (possibly multi-column) foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub table: String,
    pub columns: Vec<String>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub kind: KeyKind,
    pub columns: Vec<String>,
    pub reference: Option<Reference>,
    pub composite: bool,
    /// Single-column primary key on an auto_increment column.
    pub auto_increment: bool,
    /// Index of the column that completes this constraint.
    pub closed_at: usize,
}

#[derive(Default)]
struct Chains {
    foreign: Vec<usize>,
    primary: Vec<usize>,
    unique: Vec<usize>,
}

impl Chains {
    fn get_mut(&mut self, kind: KeyKind) -> &mut Vec<usize> {
        match kind {
            KeyKind::Foreign => &mut self.foreign,
            KeyKind::Primary => &mut self.primary,
            KeyKind::Unique => &mut self.unique,
        }
    }
}

/// Composite membership of `column` for `kind`: `Some(close_chain)` when it is a member.
fn composite_marker(column: &Column, kind: KeyKind) -> Option<bool> {
    let p = column.properties();
    match kind {
        KeyKind::Foreign => p.foreign_composite.as_ref().map(|fk| fk.close_chain),
        KeyKind::Primary => p.primary_composite,
        KeyKind::Unique => p.unique_composite,
    }
}

fn single(kind: KeyKind, index: usize, column: &Column) -> Option<Constraint> {
    let p = column.properties();
    let (present, reference) = match kind {
        KeyKind::Foreign => match &p.foreign {
            Some(fk) => (
                true,
                Some(Reference {
                    table: fk.table.clone(),
                    columns: vec![fk.column.clone()],
                    on_delete: fk.on_delete.clone(),
                    on_update: fk.on_update.clone(),
                }),
            ),
            None => (false, None),
        },
        KeyKind::Primary => (p.primary, None),
        KeyKind::Unique => (p.unique, None),
    };

    present.then(|| Constraint {
        kind,
        columns: vec![column.name().to_string()],
        reference,
        composite: false,
        auto_increment: kind == KeyKind::Primary && p.auto_increment,
        closed_at: index,
    })
}

fn close(kind: KeyKind, members: &[usize], columns: &[Column]) -> Constraint {
    let names = members
        .iter()
        .map(|&i| columns[i].name().to_string())
        .collect();
    let closed_at = members[members.len() - 1];

    let reference = match kind {
        KeyKind::Foreign => columns[closed_at]
            .properties()
            .foreign_composite
            .as_ref()
            .map(|closing| Reference {
                table: closing.reference.table.clone(),
                columns: members
                    .iter()
                    .filter_map(|&i| columns[i].properties().foreign_composite.as_ref())
                    .map(|fk| fk.reference.column.clone())
                    .collect(),
                on_delete: closing.reference.on_delete.clone(),
                on_update: closing.reference.on_update.clone(),
            }),
        _ => None,
    };

    Constraint {
        kind,
        columns: names,
        reference,
        composite: true,
        auto_increment: false,
        closed_at,
    }
}

/// All key constraints of a table in column order.
///
/// For each column, its own foreign/primary/unique keys come first, followed by any
/// composite keys it closes. A column that lacks a composite property while a chain of that
/// kind is open, or a chain still open after the last column, is rejected.
pub fn collect(table: &str, columns: &[Column]) -> Result<Vec<Constraint>, DeclarationError> {
    let mut constraints = Vec::new();
    let mut chains = Chains::default();

    for (index, column) in columns.iter().enumerate() {
        constraints.extend(KeyKind::ALL.iter().filter_map(|&k| single(k, index, column)));

        for kind in KeyKind::ALL {
            let chain = chains.get_mut(kind);
            match composite_marker(column, kind) {
                Some(close_chain) => {
                    chain.push(index);
                    if close_chain {
                        constraints.push(close(kind, chain, columns));
                        chain.clear();
                    }
                }
                None if !chain.is_empty() => {
                    return Err(DeclarationError::InterleavedChain {
                        table: table.to_string(),
                        kind: kind.to_string(),
                        column: column.name().to_string(),
                    });
                }
                None => {}
            }
        }
    }

    for kind in KeyKind::ALL {
        let chain = chains.get_mut(kind);
        if !chain.is_empty() {
            return Err(DeclarationError::UnclosedChain {
                table: table.to_string(),
                kind: kind.to_string(),
                columns: chain.iter().map(|&i| columns[i].name().to_string()).collect(),
            });
        }
    }

    Ok(constraints)
}
