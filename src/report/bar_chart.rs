use crate::error::Res;
use crate::model::{BarChartEntry, Month, PRICE_RANGES};
use crate::store::{Store, TransactionFilter};
use futures::future::try_join_all;

/// Counts the records of `month` in each of the ten price buckets. The result always has ten
/// entries in bucket order, whatever order the counts complete in.
pub async fn bar_chart(store: &dyn Store, month: Month) -> Res<Vec<BarChartEntry>> {
    let filter = TransactionFilter::for_month(month);
    let counts = PRICE_RANGES.iter().map(|range| {
        let filter = filter.clone().with_price_range(*range);
        async move {
            let count = store.count(&filter).await?;
            Ok::<_, anyhow::Error>(BarChartEntry {
                range: range.label().to_string(),
                count,
            })
        }
    });
    try_join_all(counts).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{march_and_may, march_bulk, may_example, Op, StubStore, TestEnv};

    #[tokio::test]
    async fn test_bar_chart_may_example() {
        let env = TestEnv::with_records(&may_example()).await;
        let chart = bar_chart(&env.db(), Month::new(5).unwrap()).await.unwrap();
        assert_eq!(chart.len(), 10);
        let labels: Vec<&str> = chart.iter().map(|e| e.range.as_str()).collect();
        let expected: Vec<&str> = PRICE_RANGES.iter().map(|r| r.label()).collect();
        assert_eq!(labels, expected);
        let counts: Vec<u64> = chart.iter().map(|e| e.count).collect();
        assert_eq!(counts, vec![1, 1, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn test_bar_chart_counts_sum_to_priced_records() {
        let records = march_and_may();
        let env = TestEnv::with_records(&records).await;
        let db = env.db();

        for month in Month::all() {
            let expected = records
                .iter()
                .filter(|r| r.sale_month() == Some(month) && r.price.is_some())
                .count() as u64;
            let chart = bar_chart(&db, month).await.unwrap();
            assert_eq!(chart.len(), 10);
            let total: u64 = chart.iter().map(|e| e.count).sum();
            assert_eq!(total, expected, "month {month}");
        }
    }

    #[tokio::test]
    async fn test_bar_chart_is_repeatable() {
        let env = TestEnv::with_records(&march_bulk()).await;
        let db = env.db();
        let march = Month::new(3).unwrap();
        let first = bar_chart(&db, march).await.unwrap();
        let second = bar_chart(&db, march).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_bar_chart_fails_when_any_count_fails() {
        let store = StubStore::failing_on(Op::Count);
        assert!(bar_chart(&store, Month::new(5).unwrap()).await.is_err());
    }

    #[tokio::test]
    async fn test_bar_chart_of_empty_store() {
        let store = StubStore::new();
        let chart = bar_chart(&store, Month::new(5).unwrap()).await.unwrap();
        assert_eq!(chart.len(), 10);
        assert!(chart.iter().all(|e| e.count == 0));
        assert_eq!(store.calls(), 10);
    }
}
