//! Export of the prefixed tables through an external dump tool.
//!
//! # Module Structure
//! - `request`: Parsing of the caller's destination and extra flags
//! - `flags`: Ordered, last-wins flag set
//! - `command`: Pure argument-vector construction
//! - `runner`: Process execution and exit status handling

mod command;
mod flags;
mod request;
mod runner;

pub use command::{DEFAULT_DUMP_TOOL, DumpCommand};
pub use flags::{Flag, FlagSet};
pub use request::{Destination, ExportRequest, RESULT_FILE_FLAG, STDOUT_TOKEN};
pub use runner::run;

use crate::Result;
use crate::config::ConnectionConfig;
use std::path::{Path, PathBuf};

/// What a successful export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The dump was written to this file.
    File(PathBuf),
    /// The dump was streamed to standard output.
    Stdout,
}

/// Dumps `tables` with `tool` according to `request`.
///
/// An empty table list is passed through: the tool still runs with
/// `--tables` and no table names, which mysqldump treats as "every table in
/// the database". A warning says so.
///
/// # Errors
/// Returns an I/O error if the tool cannot be started and an export error
/// if it exits unsuccessfully. Partial output files are left in place.
pub async fn export(
    tool: &Path,
    tables: &[String],
    request: &ExportRequest,
    connection: &ConnectionConfig,
) -> Result<ExportOutcome> {
    if tables.is_empty() {
        tracing::warn!(
            "No tables match the prefix; mysqldump will dump every table in {}",
            connection.database
        );
    }

    let destination = request.destination_for(&connection.database);
    let command = DumpCommand::build(tool, tables, request, connection);
    tracing::info!(
        tables = tables.len(),
        %destination,
        "Exporting prefixed tables"
    );
    run(&command).await?;

    Ok(match destination {
        Destination::File(path) => ExportOutcome::File(path),
        Destination::Stdout => ExportOutcome::Stdout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbPrefixError;
    use crate::security::Credentials;
    use std::sync::{Arc, Mutex};

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_empty_selection_warns_about_full_database_dump() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let connection = ConnectionConfig::new(
            "blog".to_string(),
            Credentials::new("wp".to_string(), String::new()),
        );
        let request = ExportRequest::parse(&["-".to_string()]).unwrap();
        let result = export(
            Path::new("/nonexistent/dbprefix-test/mysqldump"),
            &[],
            &request,
            &connection,
        )
        .await;

        assert!(matches!(result, Err(DbPrefixError::Io { .. })));
        let logs = logs.contents();
        assert!(
            logs.contains("mysqldump will dump every table in blog"),
            "unexpected log output: {logs}"
        );
    }
}
