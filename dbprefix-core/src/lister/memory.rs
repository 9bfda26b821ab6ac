//! Table lister backed by a fixed list of names.

use super::{TableLister, like_matches, prefix_like_pattern};
use crate::Result;
use async_trait::async_trait;

/// Evaluates the discovery pattern against names held in memory.
///
/// Matching is case-sensitive, unlike MySQL's default collations.
///
/// # Example
/// ```rust
/// use dbprefix_core::lister::{InMemoryTableLister, TableLister};
///
/// # tokio_test_block(async {
/// let lister = InMemoryTableLister::new(["wp_posts", "other_table", "wp_users"]);
/// let tables = lister.list_tables("wp_").await.unwrap();
/// assert_eq!(tables, vec!["wp_posts", "wp_users"]);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTableLister {
    tables: Vec<String>,
}

impl InMemoryTableLister {
    /// Creates a lister over `tables`, kept in the given order.
    pub fn new<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl TableLister for InMemoryTableLister {
    async fn list_tables(&self, prefix: &str) -> Result<Vec<String>> {
        let pattern = prefix_like_pattern(prefix);
        Ok(self
            .tables
            .iter()
            .filter(|name| like_matches(&pattern, name))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lists_prefixed_tables_in_store_order() {
        let lister = InMemoryTableLister::new(["wp_users", "other_table", "wp_posts"]);
        let tables = lister.list_tables("wp_").await.unwrap();
        assert_eq!(tables, vec!["wp_users", "wp_posts"]);
    }

    #[tokio::test]
    async fn test_underscore_in_prefix_is_literal() {
        let lister = InMemoryTableLister::new(["wp_posts", "wpxposts", "wp2_posts"]);
        assert_eq!(lister.list_tables("wp_").await.unwrap(), vec!["wp_posts"]);
    }

    #[tokio::test]
    async fn test_empty_prefix_lists_everything() {
        let lister = InMemoryTableLister::new(["b", "a"]);
        assert_eq!(lister.list_tables("").await.unwrap(), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_no_matches() {
        let lister = InMemoryTableLister::new(["other_table"]);
        assert!(lister.list_tables("wp_").await.unwrap().is_empty());
    }
}
