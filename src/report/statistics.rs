use crate::error::Res;
use crate::model::{Month, Statistics};
use crate::store::{Store, TransactionFilter};

/// Sales statistics for `month`: revenue from sold records and the sold and unsold counts.
/// Records whose `sold` flag is missing are counted in neither.
pub async fn statistics(store: &dyn Store, month: Month) -> Res<Statistics> {
    let sold = TransactionFilter::for_month(month).with_sold(true);
    let not_sold = TransactionFilter::for_month(month).with_sold(false);
    let (total_sale_amount, total_sold_items, total_not_sold_items) = tokio::try_join!(
        store.sum_price(&sold),
        store.count(&sold),
        store.count(&not_sold),
    )?;
    Ok(Statistics {
        total_sale_amount: total_sale_amount.unwrap_or(0.0),
        total_sold_items,
        total_not_sold_items,
    })
}
