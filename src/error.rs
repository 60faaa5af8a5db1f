//! Error taxonomy for declaration, ordering, statement and persistence failures.

use thiserror::Error;

/// Invalid table declarations or program input, detected before any database access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("cannot migrate table '{found}' onto snapshot of table '{expected}'")]
    NameMismatch { expected: String, found: String },

    #[error("unsupported program '{0}' (expected migrate, drop or reset)")]
    UnsupportedProgram(String),

    #[error("table '{table}': column '{column}' interrupts an open {kind} key chain")]
    InterleavedChain {
        table: String,
        kind: String,
        column: String,
    },

    #[error("table '{table}': {kind} key chain over ({}) is never closed", .columns.join(", "))]
    UnclosedChain {
        table: String,
        kind: String,
        columns: Vec<String>,
    },

    #[error("table '{table}', line {line}: type '{type_name}' is not supported")]
    UnknownType {
        table: String,
        line: usize,
        type_name: String,
    },

    #[error("table '{table}', line {line}: cannot parse column description")]
    InvalidDescription { table: String, line: usize },

    #[error("invalid identifier '{0}': use letters, digits and underscores, not starting with a digit")]
    InvalidIdentifier(String),

    #[error("table '{table}' declares column '{column}' more than once")]
    DuplicateColumn { table: String, column: String },

    #[error("table '{0}' is declared more than once")]
    DuplicateTable(String),

    #[error("table '{0}' is reserved for the migration history; rename it or configure another tracking table")]
    ReservedTable(String),
}

/// Dependency resolution could not make progress.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("circular or missing table dependencies among: {}", .unresolved.join(", "))]
pub struct CycleError {
    /// Tables left in the working set when a round moved nothing.
    pub unresolved: Vec<String>,
    /// Groups of tables that reference each other.
    pub cycles: Vec<Vec<String>>,
    /// `(table, referenced table)` pairs pointing outside the declared set.
    pub missing: Vec<(String, String)>,
    /// Rounds run, including the one that stalled.
    pub rounds: usize,
}

/// A statement the database refused or could not run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DbError {
    pub message: String,
    /// SQLSTATE reported by the server, when there is one.
    pub code: Option<String>,
}

impl DbError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// MySQL reports `42S02` for a table that does not exist.
    pub fn is_unknown_table(&self) -> bool {
        self.code.as_deref() == Some("42S02")
    }
}

/// Failures touching the bookkeeping table or the snapshot encoding.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to create bookkeeping table '{table}': {source}")]
    CreateTable { table: String, source: DbError },

    #[error("failed to record migration in '{table}': {source}")]
    Save { table: String, source: DbError },

    #[error("failed to read last migration from '{table}': {source}")]
    Load { table: String, source: DbError },

    #[error("failed to drop bookkeeping table '{table}': {source}")]
    Drop { table: String, source: DbError },

    #[error("failed to encode schema snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode schema snapshot: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error("last migration row is missing column '{0}'")]
    MissingField(&'static str),

    #[error("snapshot format version {found} is not supported (this build reads version {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}
