//! The `list` and `export` commands.
//!
//! Both take the lister as a parameter so they run the same way against a
//! live server or an in-memory table list.

use crate::cli::{Cli, Command, load_site_config};
use crate::output::{ListFormat, write_export_outcome, write_tables};
use dbprefix_core::{
    ExportOutcome, ExportRequest, MySqlTableLister, Result, SiteConfig, TableLister, dump,
};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Runs the parsed command line against the configured server.
///
/// Export arguments are validated before wp-config.php is read, the
/// password is prompted for, or any connection is made.
pub async fn run(cli: Cli) -> Result<()> {
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::List { format } => {
            let site = load_site_config(&cli.config)?;
            let lister = connect(&site).await?;
            list(&lister, &site, format, &mut stdout).await
        }
        Command::Export(args) => {
            let request = ExportRequest::parse(&args.args)?;
            let site = load_site_config(&cli.config)?;
            let lister = connect(&site).await?;
            export(&lister, &site, &request, &cli.config.mysqldump, &mut stdout)
                .await
                .map(|_| ())
        }
    }
}

/// Prints the prefixed tables.
pub async fn list<L: TableLister>(
    lister: &L,
    site: &SiteConfig,
    format: ListFormat,
    out: &mut impl Write,
) -> Result<()> {
    let tables = lister.list_tables(&site.table_prefix).await?;
    lister.close().await;
    write_tables(out, &tables, format)
}

/// Dumps the prefixed tables and reports where they went.
///
/// The lister is closed before the dump tool starts.
pub async fn export<L: TableLister>(
    lister: &L,
    site: &SiteConfig,
    request: &ExportRequest,
    tool: &Path,
    out: &mut impl Write,
) -> Result<ExportOutcome> {
    let tables = lister.list_tables(&site.table_prefix).await?;
    lister.close().await;

    let outcome = dump::export(tool, &tables, request, &site.connection).await?;
    write_export_outcome(out, &outcome)?;
    Ok(outcome)
}

/// Connects to the configured server.
pub async fn connect(site: &SiteConfig) -> Result<MySqlTableLister> {
    info!("Connecting to {}", site.connection);
    MySqlTableLister::connect(&site.connection).await
}
