// Configuration file name
pub const CONFIG_FILENAME: &str = "snapmig.yaml";

// Defaults applied when neither the config file nor the CLI sets a value
pub const DEFAULT_SCHEMA_FILE: &str = "schema.yaml";
pub const DEFAULT_DATABASE_NAME: &str = "master";
pub const DEFAULT_TRACKING_TABLE: &str = "migrations";
pub const DEFAULT_HOST: &str = "localhost";

// Environment variables consulted during config resolution
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const HOSTNAME_ENV: &str = "HOSTNAME";

/// Logged before every migrate/drop run.
pub const NON_ATOMIC_DDL_NOTICE: &str = "MySQL commits DDL implicitly: a failed run may leave tables partially \
     migrated, and rollback only undoes the bookkeeping write";
