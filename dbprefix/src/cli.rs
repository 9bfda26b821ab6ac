//! Command-line interface definition and configuration loading.

use crate::output::ListFormat;
use clap::{Args, Parser, Subcommand};
use dbprefix_core::{
    ConfigOverrides, DbPrefixError, Result, SiteConfig, WpConfigValues, dump::DEFAULT_DUMP_TOOL,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "dbprefix")]
#[command(about = "List and export the prefixed tables of a WordPress database")]
#[command(version)]
#[command(long_about = "
dbprefix - Prefix-scoped MySQL table listing and export

Works on the tables that share one table prefix, for example a single site in
a database that hosts several. Connection settings come from command-line
flags, environment variables, or the nearest wp-config.php.

The password is never passed on the mysqldump command line; it is handed to
mysqldump through the MYSQL_PWD environment variable.

Options for dbprefix itself go before the subcommand. Everything after
`export` is either the destination file or a flag for mysqldump.

EXAMPLES:
  dbprefix list
  dbprefix --prefix wp_2_ list --format json
  dbprefix export
  dbprefix export backup.sql --add-drop-table
  dbprefix export - --no-data | gzip > schema.sql.gz
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the prefixed tables
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = ListFormat::Csv)]
        format: ListFormat,
    },
    /// Dump the prefixed tables with mysqldump
    Export(ExportArgs),
}

#[derive(Args)]
pub struct ExportArgs {
    /// `[<file>] [--<flag>[=<value>] ...]`: destination (default
    /// `<dbname>.sql`, `-` for stdout) and extra mysqldump flags
    #[arg(
        value_name = "ARGS",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all log output except errors")]
    pub quiet: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Database host, optionally with `:port` or `:/path/to.sock`
    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    /// Database name
    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    /// Database user
    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Connection character set
    #[arg(long, env = "DB_CHARSET")]
    pub db_charset: Option<String>,

    /// Table prefix
    #[arg(long, env = "DB_TABLE_PREFIX")]
    pub prefix: Option<String>,

    /// Path to wp-config.php (default: nearest one above the current directory)
    #[arg(long, value_name = "FILE", env = "WP_CONFIG")]
    pub wp_config: Option<PathBuf>,

    /// Seconds to wait for the database connection
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    pub connect_timeout: u64,

    /// Prompt for the password when no other source provides one
    #[arg(long)]
    pub prompt_password: bool,

    /// Dump tool to run
    #[arg(long, value_name = "PATH", env = "MYSQLDUMP", default_value = DEFAULT_DUMP_TOOL)]
    pub mysqldump: PathBuf,
}

impl ConfigArgs {
    /// Values given on the command line or through the environment.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            db_host: self.db_host.clone(),
            db_name: self.db_name.clone(),
            db_user: self.db_user.clone(),
            db_password: self.db_password.clone(),
            db_charset: self.db_charset.clone(),
            table_prefix: self.prefix.clone(),
            connect_timeout: Some(Duration::from_secs(self.connect_timeout)),
        }
    }

    /// The wp-config.php to read, if any.
    fn wp_config_path(&self) -> Option<PathBuf> {
        self.wp_config.clone().or_else(|| {
            std::env::current_dir()
                .ok()
                .and_then(|dir| WpConfigValues::discover(&dir))
        })
    }
}

/// Resolves the site configuration from flags, environment and wp-config.php.
///
/// # Errors
/// Returns an I/O error if an explicitly named wp-config.php cannot be read
/// and a configuration error if required values are missing.
pub fn load_site_config(args: &ConfigArgs) -> Result<SiteConfig> {
    let wp = match args.wp_config_path() {
        Some(path) => {
            info!("Reading connection settings from {}", path.display());
            Some(WpConfigValues::load(&path)?)
        }
        None => None,
    };

    let mut overrides = args.overrides();
    let password_missing = overrides.db_password.is_none()
        && wp.as_ref().is_none_or(|wp| wp.db_password.is_none());
    if args.prompt_password && password_missing {
        let password = rpassword::prompt_password("Database password: ")
            .map_err(|e| DbPrefixError::io("Failed to read password", e))?;
        overrides.db_password = Some(password);
    }

    SiteConfig::resolve(overrides, wp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const CONFIG_VARS: [&str; 8] = [
        "DB_HOST",
        "DB_NAME",
        "DB_USER",
        "DB_PASSWORD",
        "DB_CHARSET",
        "DB_TABLE_PREFIX",
        "WP_CONFIG",
        "MYSQLDUMP",
    ];

    /// Runs `f` with every config variable cleared, then `vars` applied.
    fn with_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
        let mut all: Vec<(&str, Option<&str>)> = CONFIG_VARS
            .iter()
            .filter(|name| vars.iter().all(|(k, _)| k != *name))
            .map(|name| (*name, None))
            .collect();
        all.extend(vars.iter().map(|(k, v)| (*k, Some(*v))));
        temp_env::with_vars(all, f)
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_passthrough_args() {
        with_env(&[], || {
            let cli = Cli::try_parse_from([
                "dbprefix",
                "-v",
                "--prefix",
                "wp_",
                "export",
                "--add-drop-table",
                "backup.sql",
                "--where=id > 1",
            ])
            .unwrap();
            assert_eq!(cli.global.verbose, 1);
            assert_eq!(cli.config.prefix.as_deref(), Some("wp_"));
            match cli.command {
                Command::Export(args) => assert_eq!(
                    args.args,
                    vec!["--add-drop-table", "backup.sql", "--where=id > 1"]
                ),
                Command::List { .. } => panic!("expected export"),
            }
        });
    }

    #[test]
    fn test_parse_export_stdout_and_defaults() {
        with_env(&[], || {
            let cli = Cli::try_parse_from(["dbprefix", "export", "-"]).unwrap();
            assert_eq!(cli.config.mysqldump, PathBuf::from("mysqldump"));
            assert_eq!(cli.config.connect_timeout, 30);
            match cli.command {
                Command::Export(args) => assert_eq!(args.args, vec!["-"]),
                Command::List { .. } => panic!("expected export"),
            }

            let cli = Cli::try_parse_from(["dbprefix", "export"]).unwrap();
            match cli.command {
                Command::Export(args) => assert!(args.args.is_empty()),
                Command::List { .. } => panic!("expected export"),
            }
        });
    }

    #[test]
    fn test_parse_list_format() {
        with_env(&[], || {
            let cli = Cli::try_parse_from(["dbprefix", "list", "--format", "json"]).unwrap();
            assert!(matches!(
                cli.command,
                Command::List {
                    format: ListFormat::Json
                }
            ));
        });
    }

    #[test]
    fn test_env_config_overrides_wp_config() {
        let dir = tempfile::tempdir().unwrap();
        let wp_config = dir.path().join("wp-config.php");
        std::fs::write(
            &wp_config,
            "<?php\ndefine('DB_NAME', 'blog');\ndefine('DB_USER', 'wp');\n\
             define('DB_PASSWORD', 'file-pass');\ndefine('DB_HOST', 'db:3307');\n\
             $table_prefix = 'wp_';\n",
        )
        .unwrap();
        let wp_config = wp_config.to_string_lossy().into_owned();

        with_env(&[("DB_PASSWORD", "env-pass"), ("DB_TABLE_PREFIX", "wp_2_")], || {
            let cli = Cli::try_parse_from(["dbprefix", "--wp-config", &wp_config, "list"])
                .unwrap();
            let site = load_site_config(&cli.config).unwrap();

            assert_eq!(site.connection.database, "blog");
            assert_eq!(site.connection.credentials.username(), "wp");
            assert_eq!(site.connection.credentials.password(), "env-pass");
            assert_eq!(site.connection.host.port, Some(3307));
            assert_eq!(site.table_prefix, "wp_2_");
        });
    }

    #[test]
    fn test_env_only_config() {
        with_env(
            &[("DB_NAME", "blog"), ("DB_USER", "root"), ("DB_TABLE_PREFIX", "wp_")],
            || {
                let cli = Cli::try_parse_from(["dbprefix", "list"]).unwrap();
                let site = load_site_config(&cli.config).unwrap();
                assert_eq!(site.connection.host.host, "localhost");
                assert_eq!(site.connection.credentials.password(), "");
                assert_eq!(site.table_prefix, "wp_");

                let cli = Cli::try_parse_from(["dbprefix", "--connect-timeout", "0", "list"])
                    .unwrap();
                assert!(matches!(
                    load_site_config(&cli.config),
                    Err(DbPrefixError::Configuration { .. })
                ));
            },
        );
    }

    #[test]
    fn test_env_missing_explicit_wp_config() {
        with_env(&[("WP_CONFIG", "/nonexistent/wp-config.php")], || {
            let cli = Cli::try_parse_from(["dbprefix", "list"]).unwrap();
            assert!(matches!(
                load_site_config(&cli.config),
                Err(DbPrefixError::Io { .. })
            ));
        });
    }
}
