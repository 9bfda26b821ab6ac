//! Error types with credential sanitization.
//!
//! No variant ever carries the database password. Connection errors keep the
//! driver error as their source, and the driver never echoes the password
//! back.

use thiserror::Error;

/// Exit code used for malformed caller input.
pub const EXIT_INVALID_ARGUMENT: u8 = 2;

/// Exit code used for every failure that has no more specific code.
pub const EXIT_FAILURE: u8 = 1;

/// Main error type for dbprefix operations.
///
/// # Security
/// Messages never include the database password.
#[derive(Debug, Error)]
pub enum DbPrefixError {
    /// The database could not be reached
    #[error("Database connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The table discovery query failed
    #[error("Query failed: {context}")]
    Query {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The dump tool exited with a non-zero status
    #[error("{}", export_message(.code, .stderr))]
    Export { code: Option<i32>, stderr: String },

    /// Malformed arguments from the caller
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Missing or invalid configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results with DbPrefixError
pub type Result<T> = std::result::Result<T, DbPrefixError>;

fn export_message(code: &Option<i32>, stderr: &str) -> String {
    let status = code.map_or_else(
        || "dump tool was terminated by a signal".to_string(),
        |c| format!("dump tool exited with status {c}"),
    );
    let stderr = stderr.trim_end();
    if stderr.is_empty() {
        status
    } else {
        format!("{status}\n{stderr}")
    }
}

impl DbPrefixError {
    /// Creates a connection error with sanitized context
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a query error with context
    pub fn query_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Query {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit code for this error.
    ///
    /// Export failures propagate the dump tool's own exit code when it fits
    /// in a `u8` and is non-zero.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Export { code: Some(code), .. } => u8::try_from(*code)
                .ok()
                .filter(|c| *c != 0)
                .unwrap_or(EXIT_FAILURE),
            Self::InvalidArgument { .. } => EXIT_INVALID_ARGUMENT,
            _ => EXIT_FAILURE,
        }
    }
}
