//! Rendering of command results on stdout.

use clap::ValueEnum;
use dbprefix_core::{DbPrefixError, ExportOutcome, Result};
use std::io::Write;

/// Output formats for `list`
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListFormat {
    /// One comma-joined line
    #[default]
    Csv,
    /// A JSON array of names
    Json,
    /// One name per line
    Lines,
}

/// Writes the table list in the requested format.
pub fn write_tables(out: &mut impl Write, tables: &[String], format: ListFormat) -> Result<()> {
    let rendered = match format {
        ListFormat::Csv => format!("{}\n", tables.join(",")),
        ListFormat::Json => {
            let json = serde_json::to_string(tables).map_err(|e| {
                DbPrefixError::io("Failed to serialize table list", std::io::Error::other(e))
            })?;
            format!("{}\n", json)
        }
        ListFormat::Lines => tables.iter().map(|t| format!("{}\n", t)).collect(),
    };
    out.write_all(rendered.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| DbPrefixError::io("Failed to write table list", e))
}

/// Reports a finished export. Nothing is printed for stdout exports, where
/// the dump itself is the output.
pub fn write_export_outcome(out: &mut impl Write, outcome: &ExportOutcome) -> Result<()> {
    match outcome {
        ExportOutcome::File(path) => writeln!(out, "Exported to {}", path.display())
            .map_err(|e| DbPrefixError::io("Failed to write export report", e)),
        ExportOutcome::Stdout => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(tables: &[&str], format: ListFormat) -> String {
        let tables: Vec<String> = tables.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        write_tables(&mut out, &tables, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_csv_output() {
        assert_eq!(render(&["wp_posts", "wp_users"], ListFormat::Csv), "wp_posts,wp_users\n");
        assert_eq!(render(&[], ListFormat::Csv), "\n");
    }

    #[test]
    fn test_json_output() {
        assert_eq!(
            render(&["wp_posts", "wp_\"odd\""], ListFormat::Json),
            "[\"wp_posts\",\"wp_\\\"odd\\\"\"]\n"
        );
        assert_eq!(render(&[], ListFormat::Json), "[]\n");
    }

    #[test]
    fn test_lines_output() {
        assert_eq!(render(&["a", "b"], ListFormat::Lines), "a\nb\n");
        assert_eq!(render(&[], ListFormat::Lines), "");
    }

    #[test]
    fn test_export_outcome_report() {
        let mut out = Vec::new();
        write_export_outcome(&mut out, &ExportOutcome::File("blog.sql".into())).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Exported to blog.sql\n");

        let mut out = Vec::new();
        write_export_outcome(&mut out, &ExportOutcome::Stdout).unwrap();
        assert!(out.is_empty());
    }
}
