//! The seed feed: where the transaction records come from before they are stored.
//!
//! The `Feed` trait has a live implementation that downloads the JSON document over HTTP and a
//! test implementation that serves a canned document from memory. `Mode` picks between them.

mod http_feed;
mod test_feed;

use crate::error::{ErrorType, IntoResult, Res};
use crate::model::NewTransaction;
use crate::store::Store;
use crate::Config;
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

pub(crate) use http_feed::HttpFeed;
pub(crate) use test_feed::TestFeed;

/// Environment variable that switches the program to `Mode::Testing`.
pub const TEST_MODE_VAR: &str = "PRODUCT_SALES_IN_TEST_MODE";

/// Whether the program talks to the real seed feed or to the canned one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Live,
    Testing,
}

impl Mode {
    /// `Mode::Testing` when `PRODUCT_SALES_IN_TEST_MODE` is set to a non-empty value, otherwise
    /// `Mode::Live`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_VAR) {
            Ok(value) if !value.is_empty() => Mode::Testing,
            _ => Mode::Live,
        }
    }
}

/// A source of transaction records.
#[async_trait::async_trait]
pub trait Feed: Send + Sync {
    /// Fetches and decodes every record in the feed.
    async fn fetch(&self) -> Res<Vec<NewTransaction>>;
}

/// Creates the feed for `mode`.
pub(crate) fn feed(config: &Config, mode: Mode) -> Res<Arc<dyn Feed>> {
    Ok(match mode {
        Mode::Live => Arc::new(HttpFeed::new(config.seed_url())?),
        Mode::Testing => Arc::new(TestFeed::default()),
    })
}

/// Fetches the feed and replaces the contents of `store` with it. Returns the number of records
/// stored. When the fetch fails the store is left untouched.
///
/// A failed fetch is an `Upstream` error and a failed write is a `Database` error.
pub(crate) async fn seed(store: &dyn Store, feed: &dyn Feed) -> crate::Result<u64> {
    let records = feed
        .fetch()
        .await
        .context("Unable to fetch the seed feed")
        .pub_result(ErrorType::Upstream)?;
    info!("Fetched {} records from the seed feed", records.len());
    let stored = store
        .replace_all(&records)
        .await
        .context("Unable to store the seed records")
        .pub_result(ErrorType::Database)?;
    info!("Stored {stored} records");
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TransactionFilter;
    use crate::test::{may_example, Op, StubStore, TestEnv};
    use anyhow::bail;

    struct BrokenFeed;

    #[async_trait::async_trait]
    impl Feed for BrokenFeed {
        async fn fetch(&self) -> Res<Vec<NewTransaction>> {
            bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn test_seed_replaces_contents() {
        let env = TestEnv::with_records(&may_example()).await;
        let db = env.db();
        let feed = TestFeed::default();
        let expected = feed.fetch().await.unwrap().len() as u64;

        let stored = seed(&db, &feed).await.unwrap();
        assert_eq!(stored, expected);
        assert_eq!(db.count(&TransactionFilter::new()).await.unwrap(), expected);

        // Seeding twice leaves the same contents.
        seed(&db, &feed).await.unwrap();
        assert_eq!(db.count(&TransactionFilter::new()).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_store_untouched() {
        let env = TestEnv::with_records(&may_example()).await;
        let db = env.db();
        let err = seed(&db, &BrokenFeed).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Upstream);
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(db.count(&TransactionFilter::new()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_seed_reports_store_failure() {
        let store = StubStore::failing_on(Op::ReplaceAll);
        let err = seed(&store, &TestFeed::default()).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Database);
        assert!(err.to_string().contains("Unable to store the seed records"));
    }

    #[tokio::test]
    async fn test_feed_for_testing_mode_needs_no_network() {
        let env = TestEnv::new().await;
        let feed = feed(&env.config(), Mode::Testing).unwrap();
        assert!(!feed.fetch().await.unwrap().is_empty());
    }
}
