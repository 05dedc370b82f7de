use crate::error::Res;
use crate::model::{CategoryCount, Month};
use crate::store::{Store, TransactionFilter};

/// Counts the records of `month` per category. Categories are compared exactly as stored and
/// only categories that occur are returned.
pub async fn pie_chart(store: &dyn Store, month: Month) -> Res<Vec<CategoryCount>> {
    store
        .count_by_category(&TransactionFilter::for_month(month))
        .await
}
