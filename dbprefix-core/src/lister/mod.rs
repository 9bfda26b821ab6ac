//! Prefix-filtered table discovery.
//!
//! # Module Structure
//! - `mysql`: `SHOW TABLES LIKE` against a live server via `sqlx`
//! - `memory`: Fixed table list evaluated with the same LIKE pattern
//!
//! The prefix is always matched literally: `%`, `_` and `\` in it are
//! escaped, and only the trailing `%` added here acts as a wildcard.

mod memory;
mod mysql;

pub use memory::InMemoryTableLister;
pub use mysql::MySqlTableLister;

use crate::Result;
use async_trait::async_trait;

/// Source of the tables belonging to one prefix.
#[async_trait]
pub trait TableLister: Send + Sync {
    /// Returns every table whose name starts with `prefix`, in the order the
    /// backing store reports them. No sorting, filtering or deduplication is
    /// applied on top.
    async fn list_tables(&self, prefix: &str) -> Result<Vec<String>>;

    /// Releases any connection held by the lister.
    async fn close(&self) {}
}

/// Builds the LIKE pattern matching every name that starts with `prefix`.
///
/// # Example
/// ```rust
/// use dbprefix_core::lister::prefix_like_pattern;
///
/// assert_eq!(prefix_like_pattern("wp_"), r"wp\_%");
/// assert_eq!(prefix_like_pattern("100%"), r"100\%%");
/// ```
pub fn prefix_like_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 2);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Quotes `value` as a single-quoted MySQL string literal.
///
/// Escapes the same characters as `mysql_real_escape_string`.
pub fn quote_mysql_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\0' => quoted.push_str("\\0"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\x1a' => quoted.push_str("\\Z"),
            '\\' | '\'' | '"' => {
                quoted.push('\\');
                quoted.push(c);
            }
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Builds the discovery statement for `prefix`.
///
/// `SHOW TABLES LIKE` does not accept a bound parameter, so the pattern is
/// embedded as a quoted literal.
pub fn show_tables_statement(prefix: &str) -> String {
    format!(
        "SHOW TABLES LIKE {}",
        quote_mysql_string(&prefix_like_pattern(prefix))
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LikeToken {
    Literal(char),
    AnyOne,
    AnyMany,
}

fn tokenize(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '\\' => LikeToken::Literal(chars.next().unwrap_or('\\')),
            '%' => LikeToken::AnyMany,
            '_' => LikeToken::AnyOne,
            other => LikeToken::Literal(other),
        });
    }
    tokens
}

/// Evaluates a LIKE pattern (backslash escape, case-sensitive) against `name`.
pub fn like_matches(pattern: &str, name: &str) -> bool {
    let tokens = tokenize(pattern);
    let text: Vec<char> = name.chars().collect();

    let (mut t, mut p) = (0usize, 0usize);
    // Position after the last `%` seen, and the text index it was tried at.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match tokens.get(p) {
            Some(LikeToken::AnyMany) => {
                p += 1;
                backtrack = Some((p, t));
            }
            Some(LikeToken::AnyOne) => {
                p += 1;
                t += 1;
            }
            Some(LikeToken::Literal(c)) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((resume_p, resume_t)) => {
                    p = resume_p;
                    t = resume_t + 1;
                    backtrack = Some((resume_p, t));
                }
                None => return false,
            },
        }
    }

    tokens[p.min(tokens.len())..]
        .iter()
        .all(|token| *token == LikeToken::AnyMany)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_prefix_like_pattern_escapes_wildcards() {
        assert_eq!(prefix_like_pattern(""), "%");
        assert_eq!(prefix_like_pattern("wp_"), r"wp\_%");
        assert_eq!(prefix_like_pattern(r"a\b%c_"), r"a\\b\%c\_%");
    }

    #[test]
    fn test_quote_mysql_string() {
        assert_eq!(quote_mysql_string("wp_%"), "'wp_%'");
        assert_eq!(quote_mysql_string("it's"), r"'it\'s'");
        assert_eq!(quote_mysql_string(r#"a"b\c"#), r#"'a\"b\\c'"#);
        assert_eq!(quote_mysql_string("a\nb\0\r\x1a"), r"'a\nb\0\r\Z'");
    }

    #[test]
    fn test_show_tables_statement() {
        assert_eq!(show_tables_statement("wp_"), r"SHOW TABLES LIKE 'wp\\_%'");
        assert_eq!(
            show_tables_statement("x'; DROP TABLE t; --"),
            r"SHOW TABLES LIKE 'x\'; DROP TABLE t; --%'"
        );
    }

    #[test]
    fn test_like_matches() {
        assert!(like_matches("wp%", "wp_posts"));
        assert!(like_matches(r"wp\_%", "wp_posts"));
        assert!(!like_matches(r"wp\_%", "wpxposts"));
        assert!(like_matches("wp_%", "wpxposts"));
        assert!(like_matches("%", ""));
        assert!(like_matches("a%b%c", "aXXbYYc"));
        assert!(!like_matches("a%b%c", "aXXbYY"));
        assert!(like_matches("a_c", "abc"));
        assert!(!like_matches("a_c", "ac"));
        assert!(like_matches(r"100\%%", "100%_off"));
        assert!(!like_matches(r"100\%%", "1000"));
    }

    proptest! {
        #[test]
        fn prop_prefix_pattern_matches_exactly_prefixed_names(
            prefix in r"[a-z_%\\]{0,4}",
            names in prop::collection::vec(r"[a-z_%\\]{0,8}", 0..12),
        ) {
            let pattern = prefix_like_pattern(&prefix);
            for name in &names {
                prop_assert_eq!(like_matches(&pattern, name), name.starts_with(&prefix));
            }
        }
    }
}
