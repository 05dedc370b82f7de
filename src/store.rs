//! The `Store` trait: the read primitives the reports are built from, plus the bulk load used
//! by seeding.
//!
//! Every report receives the store explicitly. The SQLite implementation is `crate::db::Db`.

use crate::error::Res;
use crate::model::{CategoryCount, Month, NewTransaction, PageRequest, PriceRange, Transaction};

/// Selects transactions. Every condition that is set must hold (logical AND). An empty filter
/// selects every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    month: Option<Month>,
    search: Option<Search>,
    sold: Option<bool>,
    price_range: Option<PriceRange>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records whose sale date falls in `month`, of any year.
    pub fn for_month(month: Month) -> Self {
        Self::new().with_month(Some(month))
    }

    pub fn with_month(mut self, month: Option<Month>) -> Self {
        self.month = month;
        self
    }

    /// Free-text search; blank terms are ignored.
    pub fn with_search(mut self, term: Option<&str>) -> Self {
        self.search = term.and_then(Search::new);
        self
    }

    pub fn with_sold(mut self, sold: bool) -> Self {
        self.sold = Some(sold);
        self
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    pub fn month(&self) -> Option<Month> {
        self.month
    }

    pub fn search(&self) -> Option<&Search> {
        self.search.as_ref()
    }

    pub fn sold(&self) -> Option<bool> {
        self.sold
    }

    pub fn price_range(&self) -> Option<&PriceRange> {
        self.price_range.as_ref()
    }
}

/// A search term. It matches when the title or description contains it. When the term is a
/// number it also matches records with exactly that price.
#[derive(Debug, Clone, PartialEq)]
pub struct Search {
    term: String,
    price: Option<f64>,
}

impl Search {
    fn new(term: &str) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        Some(Self {
            term: term.to_string(),
            price: term.parse::<f64>().ok().filter(|p| p.is_finite()),
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// The term as a price, when it is numeric.
    pub fn price(&self) -> Option<f64> {
        self.price
    }
}

/// The transaction store.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Returns matching records in ascending `id` order, optionally one page of them.
    async fn find(
        &self,
        filter: &TransactionFilter,
        page: Option<PageRequest>,
    ) -> Res<Vec<Transaction>>;

    /// Counts matching records.
    async fn count(&self, filter: &TransactionFilter) -> Res<u64>;

    /// Sums `price` over matching records. `None` when nothing matches.
    async fn sum_price(&self, filter: &TransactionFilter) -> Res<Option<f64>>;

    /// Counts matching records per distinct, non-null `category`.
    async fn count_by_category(&self, filter: &TransactionFilter) -> Res<Vec<CategoryCount>>;

    /// Replaces every stored record with `records` in one atomic step. Returns the number of
    /// records stored.
    async fn replace_all(&self, records: &[NewTransaction]) -> Res<u64>;
}
