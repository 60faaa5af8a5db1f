use crate::config::types::*;
use crate::constants::{
    DEFAULT_DATABASE_NAME, DEFAULT_HOST, DEFAULT_SCHEMA_FILE, DEFAULT_TRACKING_TABLE,
};

// Config derives Default

impl Default for Database {
    fn default() -> Self {
        Self {
            name: DEFAULT_DATABASE_NAME.to_string(),
            url: None,
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            file: DEFAULT_SCHEMA_FILE.to_string(),
        }
    }
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            tracking_table: DEFAULT_TRACKING_TABLE.to_string(),
            host: DEFAULT_HOST.to_string(),
        }
    }
}
