use super::{bar_chart, pie_chart, statistics};
use crate::error::Res;
use crate::model::{Combined, Month};
use crate::store::{Store, TransactionFilter};

/// Every view of `month` at once: all of its records (unpaginated), the statistics, the bar
/// chart and the pie chart. The four parts run concurrently and the whole fails if any part
/// fails.
pub async fn combined(store: &dyn Store, month: Month) -> Res<Combined> {
    let filter = TransactionFilter::for_month(month);
    let (transactions, statistics, bar_chart, pie_chart) = tokio::try_join!(
        store.find(&filter, None),
        statistics(store, month),
        bar_chart(store, month),
        pie_chart(store, month),
    )?;
    Ok(Combined {
        transactions,
        statistics,
        bar_chart,
        pie_chart,
    })
}
