//! The payloads returned by the reporting operations.

use crate::error::{Error, Result};
use crate::model::Transaction;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Which page of a listing to return. Both values are 1 or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Result<Self> {
        if page < 1 {
            return Err(Error::request(format!("page must be 1 or greater, got {page}")));
        }
        if per_page < 1 {
            return Err(Error::request(format!(
                "perPage must be 1 or greater, got {per_page}"
            )));
        }
        Ok(Self { page, per_page })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// The number of records skipped before this page: `(page - 1) * perPage`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// One page of a listing along with the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub transactions: Vec<Transaction>,
    /// Matching records regardless of pagination.
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

/// Sales statistics for a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Sum of `price` over sold records, `0` if there are none.
    pub total_sale_amount: f64,
    pub total_sold_items: u64,
    pub total_not_sold_items: u64,
}

/// One bar of the price histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarChartEntry {
    pub range: String,
    pub count: u64,
}

/// One slice of the category pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// All four views of a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combined {
    pub transactions: Vec<Transaction>,
    pub statistics: Statistics,
    pub bar_chart: Vec<BarChartEntry>,
    pub pie_chart: Vec<CategoryCount>,
}
