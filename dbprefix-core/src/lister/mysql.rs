//! Table discovery against a live MySQL server.
//!
//! # Security Features
//! - One connection, closed as soon as discovery is done
//! - Connect timeout from configuration
//! - Password passed to the driver only, never logged

use super::{TableLister, show_tables_statement};
use crate::config::ConnectionConfig;
use crate::{Result, error::DbPrefixError};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::Row;

/// Lists prefixed tables with `SHOW TABLES LIKE`.
pub struct MySqlTableLister {
    pool: MySqlPool,
    target: String,
}

impl std::fmt::Debug for MySqlTableLister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlTableLister")
            .field("target", &self.target)
            .field("pool_size", &self.pool.size())
            .finish_non_exhaustive()
    }
}

impl MySqlTableLister {
    /// Connects to the configured database.
    ///
    /// # Errors
    /// Returns a connection error if the server cannot be reached or rejects
    /// the credentials within the configured timeout.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;
        let target = config.to_string();
        tracing::debug!(%target, "Connecting to MySQL");

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options(config))
            .await
            .map_err(|e| DbPrefixError::connection_failed(format!("cannot reach {}", target), e))?;

        Ok(Self { pool, target })
    }
}

#[async_trait]
impl TableLister for MySqlTableLister {
    async fn list_tables(&self, prefix: &str) -> Result<Vec<String>> {
        let statement = show_tables_statement(prefix);
        tracing::debug!(%statement, "Discovering prefixed tables");

        let rows = sqlx::query(&statement)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DbPrefixError::query_failed(
                    format!("SHOW TABLES failed on {}", self.target),
                    e,
                )
            })?;

        // Table names are read as bytes: the column may carry a binary
        // collation depending on server version.
        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            let raw: Vec<u8> = row.try_get(0).map_err(|e| {
                DbPrefixError::query_failed("Failed to read table name from result", e)
            })?;
            let name = String::from_utf8(raw).map_err(|e| {
                DbPrefixError::query_failed("Table name is not valid UTF-8", e)
            })?;
            tables.push(name);
        }

        tracing::info!(count = tables.len(), prefix, "Discovered prefixed tables");
        Ok(tables)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Translates the connection configuration into driver options.
pub(crate) fn connect_options(config: &ConnectionConfig) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .host(&config.host.host)
        .username(config.credentials.username())
        .password(config.credentials.password())
        .database(&config.database);

    if let Some(port) = config.host.port {
        options = options.port(port);
    }
    if let Some(socket) = &config.host.socket {
        options = options.socket(socket);
    }
    if let Some(charset) = &config.charset {
        options = options.charset(charset);
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostSpec;
    use crate::security::Credentials;
    use std::time::Duration;

    fn config(host: &str) -> ConnectionConfig {
        ConnectionConfig::new(
            "blog".to_string(),
            Credentials::new("wp".to_string(), "secret".to_string()),
        )
        .with_host(HostSpec::parse(host).unwrap())
        .with_connect_timeout(Duration::from_secs(1))
    }

    #[test]
    fn test_connect_options_use_host_and_port() {
        let options = connect_options(&config("db.internal:3307"));
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 3307);
        assert_eq!(options.get_username(), "wp");
        assert_eq!(options.get_database(), Some("blog"));
    }

    #[test]
    fn test_connect_options_use_socket() {
        let options = connect_options(&config("localhost:/tmp/mysql.sock"));
        assert_eq!(
            options.get_socket().map(|p| p.as_path()),
            Some(std::path::Path::new("/tmp/mysql.sock"))
        );
    }

    #[tokio::test]
    async fn test_connect_unreachable_server_is_connection_error() {
        let result = MySqlTableLister::connect(&config("127.0.0.1:1")).await;
        match result {
            Err(DbPrefixError::Connection { context, .. }) => {
                assert!(context.contains("127.0.0.1"));
                assert!(!context.contains("secret"));
            }
            other => panic!("expected connection error, got {:?}", other),
        }
    }
}
