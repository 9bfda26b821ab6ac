//! Database connection configuration.
//!
//! Built once at startup and passed explicitly to both the table lister and
//! the dump command builder.

use super::HostSpec;
use crate::security::Credentials;
use std::time::Duration;

/// Default time allowed for establishing the database connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the MySQL connection.
///
/// # Security
/// `Display` omits the user and password. `Debug` redacts the password.
///
/// # Example
/// ```rust
/// use dbprefix_core::config::{ConnectionConfig, HostSpec};
/// use dbprefix_core::security::Credentials;
///
/// let config = ConnectionConfig::new(
///     "blog".to_string(),
///     Credentials::new("wp".to_string(), "secret".to_string()),
/// )
/// .with_host(HostSpec::parse("db.internal:3307").unwrap())
/// .with_charset("utf8mb4".to_string());
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.to_string(), "ConnectionConfig(db.internal:3307/blog)");
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Host, port and socket
    pub host: HostSpec,
    /// Database name
    pub database: String,
    /// User and password
    pub credentials: Credentials,
    /// Optional connection character set
    pub charset: Option<String>,
    /// Connection timeout duration
    pub connect_timeout: Duration,
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConnectionConfig({}/{})", self.host, self.database)
    }
}

impl ConnectionConfig {
    /// Creates a new connection config for `localhost` with safe defaults.
    pub fn new(database: String, credentials: Credentials) -> Self {
        Self {
            host: HostSpec::default(),
            database,
            credentials,
            charset: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Builder method to set the host.
    pub fn with_host(mut self, host: HostSpec) -> Self {
        self.host = host;
        self
    }

    /// Builder method to set the character set.
    pub fn with_charset(mut self, charset: String) -> Self {
        self.charset = Some(charset);
        self
    }

    /// Builder method to set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Validates connection configuration parameters.
    ///
    /// # Errors
    /// Returns error if configuration values are missing or invalid
    pub fn validate(&self) -> crate::Result<()> {
        if self.database.is_empty() {
            return Err(crate::error::DbPrefixError::configuration(
                "database name cannot be empty",
            ));
        }

        if self.credentials.username().is_empty() {
            return Err(crate::error::DbPrefixError::configuration(
                "database user cannot be empty",
            ));
        }

        if self.host.host.is_empty() {
            return Err(crate::error::DbPrefixError::configuration(
                "host cannot be empty",
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(crate::error::DbPrefixError::configuration(
                "connect_timeout must be greater than 0",
            ));
        }

        Ok(())
    }
}
