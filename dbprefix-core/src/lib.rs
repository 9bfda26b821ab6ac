//! Core of dbprefix: prefix-filtered MySQL table discovery and export.
//!
//! The `dbprefix` binary wires these pieces together; they are exposed here
//! so each can be tested on its own.
//!
//! # Security Guarantees
//! - The database password is never logged, printed or put on a command line
//! - The dump tool is started from an argument vector, never through a shell
//! - Discovery is a single read-only `SHOW TABLES` statement
//!
//! # Architecture
//! - `config`: connection settings resolved once and passed explicitly
//! - `lister`: the `TableLister` trait with MySQL and in-memory backends
//! - `dump`: a pure command builder and an effectful runner

pub mod config;
pub mod dump;
pub mod error;
pub mod lister;
pub mod logging;
pub mod security;

// Re-export commonly used types
pub use config::{ConfigOverrides, ConnectionConfig, HostSpec, SiteConfig, WpConfigValues};
pub use dump::{Destination, DumpCommand, ExportOutcome, ExportRequest, FlagSet, export};
pub use error::{DbPrefixError, Result};
pub use lister::{InMemoryTableLister, MySqlTableLister, TableLister};
pub use logging::init_logging;
