//! The reporting operations. Each one receives the store explicitly and builds its answer from
//! the store's filter, count, sum and group primitives.
//!
//! Operations that need more than one query issue them concurrently and join them fail-fast:
//! the first error drops every query still in flight and no partial result is returned.

mod bar_chart;
mod combined;
mod listing;
mod pie_chart;
mod statistics;

pub use bar_chart::bar_chart;
pub use combined::combined;
pub use listing::listing;
pub use pie_chart::pie_chart;
pub use statistics::statistics;

use crate::error::{Error, Result};
use crate::model::Month;

pub const MONTH_REQUIRED: &str = "Month is required";

/// Unwraps the month of a report that cannot run without one.
pub fn require_month(month: Option<Month>) -> Result<Month> {
    month.ok_or_else(|| Error::request(MONTH_REQUIRED))
}
