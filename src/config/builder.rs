use crate::config::{merge::Merge, types::*};
use crate::constants::{DATABASE_URL_ENV, HOSTNAME_ENV};
use crate::render::is_valid_identifier;
use anyhow::{Result, anyhow};

pub struct ConfigBuilder {
    config_input: ConfigInput,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config_input: ConfigInput::default(),
        }
    }

    pub fn with_file(mut self, file_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(file_input);
        self
    }

    pub fn with_cli_args(mut self, cli_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(cli_input);
        self
    }

    /// Resolve against the process environment.
    pub fn resolve(self) -> Result<Config> {
        self.resolve_with_env(with_system_hostname(|key| std::env::var(key).ok()))
    }

    /// Resolve with an explicit environment lookup. Explicit values win over the environment,
    /// which wins over defaults.
    pub fn resolve_with_env(self, env: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let defaults = Config::default();

        Ok(Config {
            database: self.resolve_database(&defaults.database, &env),
            schema: self.resolve_schema(&defaults.schema),
            migration: self.resolve_migration(&defaults.migration, &env)?,
        })
    }

    fn resolve_database(
        &self,
        defaults: &Database,
        env: &impl Fn(&str) -> Option<String>,
    ) -> Database {
        let db_input = self.config_input.database.as_ref();

        Database {
            name: db_input
                .and_then(|d| d.name.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.name.clone()),
            url: db_input
                .and_then(|d| d.url.as_ref())
                .cloned()
                .or_else(|| env(DATABASE_URL_ENV).filter(|v| !v.is_empty()))
                .or_else(|| defaults.url.clone()),
        }
    }

    fn resolve_schema(&self, defaults: &Schema) -> Schema {
        let schema_input = self.config_input.schema.as_ref();

        Schema {
            file: schema_input
                .and_then(|s| s.file.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.file.clone()),
        }
    }

    fn resolve_migration(
        &self,
        defaults: &MigrationSettings,
        env: &impl Fn(&str) -> Option<String>,
    ) -> Result<MigrationSettings> {
        let mig_input = self.config_input.migration.as_ref();

        let tracking_table = mig_input
            .and_then(|m| m.tracking_table.as_ref())
            .cloned()
            .unwrap_or_else(|| defaults.tracking_table.clone());

        if !is_valid_identifier(&tracking_table) {
            return Err(anyhow!(
                "Invalid tracking table name '{}': must contain only letters, numbers, underscores, and dollar signs, starting with letter or underscore",
                tracking_table
            ));
        }

        let host = mig_input
            .and_then(|m| m.host.as_ref())
            .cloned()
            .or_else(|| env(HOSTNAME_ENV).filter(|v| !v.is_empty()))
            .unwrap_or_else(|| defaults.host.clone());

        Ok(MigrationSettings {
            tracking_table,
            host,
        })
    }
}

/// `$HOSTNAME` is rarely exported, so fall back to the OS hostname for it.
pub fn with_system_hostname(
    env: impl Fn(&str) -> Option<String>,
) -> impl Fn(&str) -> Option<String> {
    move |key: &str| {
        env(key)
            .filter(|v| !v.is_empty())
            .or_else(|| (key == HOSTNAME_ENV).then(system_hostname).flatten())
    }
}

pub fn system_hostname() -> Option<String> {
    gethostname::gethostname()
        .into_string()
        .ok()
        .map(|host| host.trim().to_string())
        .filter(|host| !host.is_empty())
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
