//! Types that represent the core data model: `Transaction`, `Month`, the price buckets and the
//! report payloads.
mod month;
mod price_range;
mod report;
mod transaction;

pub use month::Month;
pub use price_range::{PriceRange, PRICE_RANGES};
pub use report::{
    BarChartEntry, CategoryCount, Combined, Listing, PageRequest, Statistics, DEFAULT_PAGE,
    DEFAULT_PER_PAGE,
};
pub use transaction::{NewTransaction, Transaction};
