use anyhow::Result;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use tracing::log::LevelFilter;

/// Mask password in database URL for display
pub fn mask_url_password(url: &str) -> String {
    let Some((protocol, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    if let Some(at_pos) = rest.rfind('@') {
        let user_info = &rest[..at_pos];
        let host_and_path = &rest[at_pos + 1..];

        if let Some(colon_pos) = user_info.find(':') {
            let username = &user_info[..colon_pos];
            return format!("{}://{}:***@{}", protocol, username, host_and_path);
        }
    }

    url.to_string()
}

/// Database connection configuration
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Maximum number of retries for database connections
    pub max_retries: u32,
    /// Delay between connection retries
    pub retry_delay: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_delay: Duration::from_millis(200),
        }
    }
}

/// Open a single connection, retrying transient failures.
pub async fn connect_with_retry(url: &str) -> Result<MySqlConnection> {
    connect_with_retry_config(url, &ConnectionConfig::default()).await
}

/// Open a single connection with custom retry configuration.
///
/// Slow statement logging is disabled; schema changes on large tables are expected to be slow.
pub async fn connect_with_retry_config(
    url: &str,
    config: &ConnectionConfig,
) -> Result<MySqlConnection> {
    let options = MySqlConnectOptions::from_str(url)
        .map_err(|e| anyhow::anyhow!("Invalid database URL {}: {}", mask_url_password(url), e))?
        .log_slow_statements(LevelFilter::Off, Duration::from_secs(0));

    let mut last_error = None;

    for attempt in 0..=config.max_retries {
        match MySqlConnection::connect_with(&options).await {
            Ok(conn) => {
                if attempt > 0 {
                    info!(
                        "Connected to database (after {} retr{})",
                        attempt,
                        if attempt == 1 { "y" } else { "ies" }
                    );
                } else {
                    info!("Connected to database");
                }
                return Ok(conn);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < config.max_retries {
                    if attempt == 0 {
                        info!("Database not ready, retrying...");
                    }
                    tokio::time::sleep(config.retry_delay).await;
                }
            }
        }
    }

    Err(anyhow::anyhow!(
        "Failed to connect to database at {} after {} attempts: {}",
        mask_url_password(url),
        config.max_retries + 1,
        last_error.map_or_else(|| "no attempt made".to_string(), |e| e.to_string())
    ))
}
