//! Connection and table-prefix configuration.
//!
//! # Module Structure
//! - `connection`: The `ConnectionConfig` threaded into lister and dump builder
//! - `host`: `DB_HOST` parsing (host, port, socket)
//! - `wp_config`: Constant extraction from `wp-config.php`
//!
//! Values are resolved once at startup, flags and environment first, then
//! `wp-config.php`, then defaults.

mod connection;
mod host;
mod wp_config;

pub use connection::{ConnectionConfig, DEFAULT_CONNECT_TIMEOUT};
pub use host::HostSpec;
pub use wp_config::{WP_CONFIG_FILE, WpConfigValues};

use crate::{Result, error::DbPrefixError, security::Credentials};
use std::time::Duration;

/// Values supplied on the command line or through the environment.
///
/// Any field left `None` falls back to `wp-config.php`.
#[derive(Default, Clone)]
pub struct ConfigOverrides {
    /// Raw `DB_HOST` value
    pub db_host: Option<String>,
    /// Database name
    pub db_name: Option<String>,
    /// Database user
    pub db_user: Option<String>,
    /// Database password
    pub db_password: Option<String>,
    /// Connection character set
    pub db_charset: Option<String>,
    /// Table prefix
    pub table_prefix: Option<String>,
    /// Connection timeout
    pub connect_timeout: Option<Duration>,
}

impl std::fmt::Debug for ConfigOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigOverrides")
            .field("db_host", &self.db_host)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &self.db_password.as_ref().map(|_| "****"))
            .field("db_charset", &self.db_charset)
            .field("table_prefix", &self.table_prefix)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Everything one invocation needs to know about the site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Connection settings
    pub connection: ConnectionConfig,
    /// Prefix shared by the site's tables
    pub table_prefix: String,
}

impl SiteConfig {
    /// Merges overrides with `wp-config.php` values and validates the result.
    ///
    /// # Errors
    /// Returns a configuration error if the database name, user or table
    /// prefix is missing, or if any value is invalid.
    pub fn resolve(overrides: ConfigOverrides, wp: Option<WpConfigValues>) -> Result<Self> {
        let wp = wp.unwrap_or_default();

        let database = overrides
            .db_name
            .or(wp.db_name)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| DbPrefixError::configuration("database name is not configured"))?;
        let user = overrides
            .db_user
            .or(wp.db_user)
            .ok_or_else(|| DbPrefixError::configuration("database user is not configured"))?;
        let password = overrides.db_password.or(wp.db_password).unwrap_or_default();
        let table_prefix = overrides
            .table_prefix
            .or(wp.table_prefix)
            .ok_or_else(|| DbPrefixError::configuration("table prefix is not configured"))?;

        let host = match overrides.db_host.or(wp.db_host) {
            Some(raw) => HostSpec::parse(&raw)?,
            None => HostSpec::default(),
        };

        let mut connection = ConnectionConfig::new(database, Credentials::new(user, password))
            .with_host(host)
            .with_connect_timeout(overrides.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT));
        // WordPress treats an empty DB_CHARSET as "not set".
        if let Some(charset) = overrides
            .db_charset
            .or(wp.db_charset)
            .filter(|charset| !charset.is_empty())
        {
            connection = connection.with_charset(charset);
        }

        connection.validate()?;

        Ok(Self {
            connection,
            table_prefix,
        })
    }
}
