use crate::config::types::*;

/// Trait for merging optional configuration values
pub trait Merge<T> {
    fn merge(self, other: T) -> T;
}

impl<T> Merge<Option<T>> for Option<T> {
    fn merge(self, other: Option<T>) -> Option<T> {
        other.or(self)
    }
}

impl Merge<ConfigInput> for ConfigInput {
    fn merge(self, other: ConfigInput) -> ConfigInput {
        ConfigInput {
            database: match (self.database, other.database) {
                (Some(a), Some(b)) => Some(a.merge_with(b)),
                (a, b) => a.merge(b),
            },
            schema: match (self.schema, other.schema) {
                (Some(a), Some(b)) => Some(a.merge_with(b)),
                (a, b) => a.merge(b),
            },
            migration: match (self.migration, other.migration) {
                (Some(a), Some(b)) => Some(a.merge_with(b)),
                (a, b) => a.merge(b),
            },
        }
    }
}

// Field-wise merges: values from `other` win
impl DatabaseInput {
    pub fn merge_with(self, other: DatabaseInput) -> DatabaseInput {
        DatabaseInput {
            name: self.name.merge(other.name),
            url: self.url.merge(other.url),
        }
    }
}

impl SchemaInput {
    pub fn merge_with(self, other: SchemaInput) -> SchemaInput {
        SchemaInput {
            file: self.file.merge(other.file),
        }
    }
}

impl MigrationInput {
    pub fn merge_with(self, other: MigrationInput) -> MigrationInput {
        MigrationInput {
            tracking_table: self.tracking_table.merge(other.tracking_table),
            host: self.host.merge(other.host),
        }
    }
}
