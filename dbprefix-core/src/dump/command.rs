//! Pure construction of the dump tool invocation.
//!
//! The result is an argument vector handed straight to the OS. No shell is
//! involved, so quotes, spaces, `;`, `$()` and backticks in table names or
//! flag values stay literal.

use super::{Destination, ExportRequest, FlagSet, RESULT_FILE_FLAG};
use crate::config::ConnectionConfig;
use crate::security::MYSQL_PASSWORD_ENV;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Dump tool used when none is configured.
pub const DEFAULT_DUMP_TOOL: &str = "mysqldump";

const PASSWORD_FLAG: &str = "pass";

/// A fully built dump tool invocation.
#[derive(Clone)]
pub struct DumpCommand {
    program: PathBuf,
    args: Vec<String>,
    env: Vec<(String, Zeroizing<String>)>,
}

impl std::fmt::Debug for DumpCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DumpCommand")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("env", &self.env_names().collect::<Vec<_>>())
            .finish()
    }
}

impl DumpCommand {
    /// Builds the invocation for `tables`.
    ///
    /// Argument layout:
    /// `--no-defaults [flags...] --tables -- <database> [tables...]`
    ///
    /// Flags are the caller's flags, then `--result-file` for a file
    /// destination, then the connection settings. A later entry with the
    /// same name replaces an earlier one, so configuration wins over the
    /// caller. The password is moved into `MYSQL_PWD` rather than the
    /// argument list. The tool ranks its command line above `MYSQL_PWD`, so
    /// every caller flag naming the password option is dropped. Everything
    /// after `--` is positional, even a table name that begins with a dash.
    pub fn build(
        tool: &Path,
        tables: &[String],
        request: &ExportRequest,
        connection: &ConnectionConfig,
    ) -> Self {
        let mut flags = request.flags.clone();
        flags.retain(|flag| !flag.is_password());

        if let Destination::File(path) = request.destination_for(&connection.database) {
            flags.insert(RESULT_FILE_FLAG, Some(path.to_string_lossy().into_owned()));
        }
        flags.merge(connection_flags(connection));

        let mut env = Vec::new();
        if let Some(password) = flags.remove(PASSWORD_FLAG) {
            env.push((
                MYSQL_PASSWORD_ENV.to_string(),
                Zeroizing::new(password.value.unwrap_or_default()),
            ));
        }

        let mut args = Vec::with_capacity(flags.len() + tables.len() + 5);
        args.push("--no-defaults".to_string());
        args.extend(flags.to_args());
        args.push("--tables".to_string());
        args.push("--".to_string());
        args.push(connection.database.clone());
        args.extend(tables.iter().cloned());

        Self {
            program: tool.to_path_buf(),
            args,
            env,
        }
    }

    /// Program to execute.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments, excluding the program name.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Names of the environment variables set for the child.
    pub fn env_names(&self) -> impl Iterator<Item = &str> {
        self.env.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn env(&self) -> impl Iterator<Item = (&str, &str)> {
        self.env
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Connection settings as dump tool flags.
fn connection_flags(connection: &ConnectionConfig) -> FlagSet {
    let mut flags = FlagSet::new();
    flags.insert("host", Some(connection.host.host.clone()));
    if let Some(port) = connection.host.port {
        flags.insert("port", Some(port.to_string()));
    }
    if let Some(socket) = &connection.host.socket {
        flags.insert("socket", Some(socket.to_string_lossy().into_owned()));
    }
    flags.insert("user", Some(connection.credentials.username().to_string()));
    flags.insert(
        PASSWORD_FLAG,
        Some(connection.credentials.password().to_string()),
    );
    if let Some(charset) = &connection.charset {
        flags.insert("default-character-set", Some(charset.clone()));
    }
    flags
}
