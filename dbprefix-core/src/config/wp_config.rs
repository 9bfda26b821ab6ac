//! Extraction of connection constants from a WordPress `wp-config.php`.
//!
//! The file is never executed. `define('DB_*', '...')` calls and the
//! `$table_prefix` assignment are matched with pre-compiled patterns; values
//! must be plain string literals.

use crate::{Result, error::DbPrefixError};
use regex::Regex;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// File name searched for when no explicit path is given.
pub const WP_CONFIG_FILE: &str = "wp-config.php";

/// Values read from `wp-config.php`. Absent constants stay `None`.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct WpConfigValues {
    /// Database name
    pub db_name: Option<String>,
    /// Database user
    pub db_user: Option<String>,
    /// Database password
    pub db_password: Option<String>,
    /// Raw `DB_HOST` value
    pub db_host: Option<String>,
    /// Connection character set
    pub db_charset: Option<String>,
    /// Table prefix
    pub table_prefix: Option<String>,
}

impl std::fmt::Debug for WpConfigValues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WpConfigValues")
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &self.db_password.as_ref().map(|_| "****"))
            .field("db_host", &self.db_host)
            .field("db_charset", &self.db_charset)
            .field("table_prefix", &self.table_prefix)
            .finish()
    }
}

struct WpConfigPatterns {
    define: Regex,
    table_prefix: Regex,
}

impl WpConfigPatterns {
    fn instance() -> &'static Self {
        static PATTERNS: OnceLock<WpConfigPatterns> = OnceLock::new();
        PATTERNS.get_or_init(|| Self {
            define: Regex::new(
                r#"define\s*\(\s*['"](DB_NAME|DB_USER|DB_PASSWORD|DB_HOST|DB_CHARSET)['"]\s*,\s*(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)")\s*\)"#,
            )
            .expect("Invalid define pattern"),
            table_prefix: Regex::new(
                r#"\$table_prefix\s*=\s*(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)")\s*;"#,
            )
            .expect("Invalid table prefix pattern"),
        })
    }
}

impl WpConfigValues {
    /// Extracts the connection constants and table prefix from PHP source.
    ///
    /// Matches inside `//`, `#` and `/* */` comments are skipped. When a
    /// constant is defined twice the first definition wins, as it does in PHP.
    pub fn parse(source: &str) -> Self {
        let patterns = WpConfigPatterns::instance();
        let comments = comment_ranges(source);
        let is_commented = |offset: usize| comments.iter().any(|range| range.contains(&offset));
        let mut values = Self::default();

        for caps in patterns.define.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            if is_commented(whole.start()) {
                continue;
            }
            let value = literal_value(&caps, 2, 3);
            let slot = match &caps[1] {
                "DB_NAME" => &mut values.db_name,
                "DB_USER" => &mut values.db_user,
                "DB_PASSWORD" => &mut values.db_password,
                "DB_HOST" => &mut values.db_host,
                _ => &mut values.db_charset,
            };
            if slot.is_none() {
                *slot = value;
            }
        }

        values.table_prefix = patterns
            .table_prefix
            .captures_iter(source)
            .filter(|caps| caps.get(0).is_some_and(|m| !is_commented(m.start())))
            .last()
            .and_then(|caps| literal_value(&caps, 1, 2));

        values
    }

    /// Reads and parses a `wp-config.php` file.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| DbPrefixError::io(format!("Failed to read {}", path.display()), e))?;
        let values = Self::parse(&source);
        tracing::debug!(path = %path.display(), ?values, "Loaded wp-config");
        Ok(values)
    }

    /// Finds the nearest `wp-config.php` in `start` or any of its ancestors.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(WP_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }
}

/// Byte ranges of the PHP comments in `source`.
///
/// String literals are stepped over so that `'/*'` or `"#"` inside a value
/// does not open a comment. An unterminated block comment runs to the end.
fn comment_ranges(source: &str) -> Vec<Range<usize>> {
    let bytes = source.as_bytes();
    let line_end = |from: usize| source[from..].find('\n').map_or(bytes.len(), |i| from + i);
    let mut ranges = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = source[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |offset| i + 2 + offset + 2);
                ranges.push(i..end);
                i = end;
            }
            b'#' => {
                let end = line_end(i);
                ranges.push(i..end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = line_end(i);
                ranges.push(i..end);
                i = end;
            }
            _ => i += 1,
        }
    }
    ranges
}

fn literal_value(caps: &regex::Captures<'_>, single: usize, double: usize) -> Option<String> {
    if let Some(m) = caps.get(single) {
        Some(unescape(m.as_str(), '\''))
    } else {
        caps.get(double).map(|m| unescape(m.as_str(), '"'))
    }
}

/// Undoes PHP string-literal escapes for the quote style in use.
fn unescape(raw: &str, quote: char) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next) if next == '\\' || next == quote => out.push(next),
            Some('$') if quote == '"' => out.push('$'),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}
