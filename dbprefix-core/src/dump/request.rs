//! Parsing of the `export` arguments into an [`ExportRequest`].
//!
//! Everything here runs before any database or process work, so malformed
//! input is rejected without side effects.

use super::{Flag, FlagSet};
use crate::{Result, error::DbPrefixError};
use std::path::PathBuf;

/// Destination token meaning "stream to standard output".
pub const STDOUT_TOKEN: &str = "-";

/// Flag the dump tool writes its output file through. Only the destination
/// argument may set it.
pub const RESULT_FILE_FLAG: &str = "result-file";

/// Where the dump goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The dump tool writes to its own stdout, which is inherited.
    Stdout,
    /// The dump tool writes to this path via `--result-file`.
    File(PathBuf),
}

impl Destination {
    /// Interprets a destination argument; `-` selects stdout.
    pub fn from_arg(arg: &str) -> Self {
        if arg == STDOUT_TOKEN {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    /// Default destination: `<database>.sql` in the current directory.
    pub fn default_for(database: &str) -> Self {
        Self::File(PathBuf::from(format!("{}.sql", database)))
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A parsed `export` invocation.
///
/// Parsing needs no configuration, so it can run before anything is read
/// from disk or the terminal. The default destination depends on the
/// database name and is applied by [`ExportRequest::destination_for`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Where the dump goes, or `None` for `<database>.sql`
    pub destination: Option<Destination>,
    /// Extra flags forwarded to the dump tool
    pub flags: FlagSet,
}

impl ExportRequest {
    /// Parses `[<file>] [--<flag>[=<value>] ...]`.
    ///
    /// # Errors
    /// Returns an invalid argument error for a second positional argument,
    /// an empty destination, short options, malformed flag names, the bare
    /// `--` separator, or a caller-supplied `--result-file`.
    ///
    /// # Example
    /// ```rust
    /// use dbprefix_core::dump::{Destination, ExportRequest};
    ///
    /// let args = vec!["--add-drop-table".to_string(), "-".to_string()];
    /// let request = ExportRequest::parse(&args).unwrap();
    /// assert_eq!(request.destination_for("blog"), Destination::Stdout);
    /// assert_eq!(request.flags.to_args(), vec!["--add-drop-table"]);
    /// ```
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut destination = None;
        let mut flags = FlagSet::new();

        for arg in args {
            if let Some(option) = arg.strip_prefix("--") {
                let flag = parse_flag(option, arg)?;
                if flag.name == RESULT_FILE_FLAG {
                    return Err(DbPrefixError::invalid_argument(
                        "--result-file cannot be passed through; give the path as the <file> argument",
                    ));
                }
                flags.insert(flag.name, flag.value);
            } else if arg.starts_with('-') && arg != STDOUT_TOKEN {
                return Err(DbPrefixError::invalid_argument(format!(
                    "'{}' is not supported; use --<flag>=<value>",
                    arg
                )));
            } else if arg.is_empty() {
                return Err(DbPrefixError::invalid_argument("destination file cannot be empty"));
            } else if destination.is_some() {
                return Err(DbPrefixError::invalid_argument(format!(
                    "unexpected argument '{}': only one destination file may be given",
                    arg
                )));
            } else {
                destination = Some(Destination::from_arg(arg));
            }
        }

        Ok(Self { destination, flags })
    }

    /// The destination, defaulting to `<database>.sql`.
    pub fn destination_for(&self, database: &str) -> Destination {
        self.destination
            .clone()
            .unwrap_or_else(|| Destination::default_for(database))
    }
}

fn parse_flag(option: &str, original: &str) -> Result<Flag> {
    let (name, value) = match option.split_once('=') {
        Some((name, value)) => (name, Some(value.to_string())),
        None => (option, None),
    };

    let mut chars = name.chars();
    let well_formed = chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !well_formed {
        return Err(DbPrefixError::invalid_argument(format!(
            "malformed flag '{}'; expected --<flag> or --<flag>=<value>",
            original
        )));
    }

    Ok(Flag::new(name, value))
}
