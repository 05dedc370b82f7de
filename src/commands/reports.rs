//! The report commands. Each one runs a report against the local database and returns it as the
//! command's structured output.

use crate::args::ListArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::{BarChartEntry, CategoryCount, Combined, Listing, Month, PageRequest, Statistics};
use crate::{report, Config, Result};

pub async fn list(config: Config, args: &ListArgs) -> Result<Out<Listing>> {
    let page = PageRequest::new(args.page(), args.per_page())?;
    let listing = report::listing(config.db(), args.month(), args.search(), page)
        .await
        .pub_result(ErrorType::Database)?;
    config.db().close().await;
    let message = format!(
        "Showing {} of {} matching transactions",
        listing.transactions.len(),
        listing.total
    );
    Ok(Out::new(message, listing))
}

pub async fn statistics(config: Config, month: Month) -> Result<Out<Statistics>> {
    let statistics = report::statistics(config.db(), month)
        .await
        .pub_result(ErrorType::Database)?;
    config.db().close().await;
    Ok(Out::new(format!("Statistics for month {month}"), statistics))
}

pub async fn bar_chart(config: Config, month: Month) -> Result<Out<Vec<BarChartEntry>>> {
    let chart = report::bar_chart(config.db(), month)
        .await
        .pub_result(ErrorType::Database)?;
    config.db().close().await;
    Ok(Out::new(format!("Price ranges for month {month}"), chart))
}

pub async fn pie_chart(config: Config, month: Month) -> Result<Out<Vec<CategoryCount>>> {
    let chart = report::pie_chart(config.db(), month)
        .await
        .pub_result(ErrorType::Database)?;
    config.db().close().await;
    Ok(Out::new(format!("Categories for month {month}"), chart))
}

pub async fn combined(config: Config, month: Month) -> Result<Out<Combined>> {
    let combined = report::combined(config.db(), month)
        .await
        .pub_result(ErrorType::Database)?;
    config.db().close().await;
    Ok(Out::new(format!("All reports for month {month}"), combined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{march_bulk, may_example, TestEnv};

    #[tokio::test]
    async fn test_list_command() {
        let env = TestEnv::with_records(&march_bulk()).await;
        let args = ListArgs::new(None, None, 3, 10);
        let out = list(env.config(), &args).await.unwrap();
        assert_eq!(out.message(), "Showing 5 of 25 matching transactions");
        assert_eq!(out.structure().unwrap().page, 3);
    }

    #[tokio::test]
    async fn test_list_command_rejects_page_zero() {
        let env = TestEnv::new().await;
        let args = ListArgs::new(None, None, 0, 10);
        let e = list(env.config(), &args).await.unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Request);
    }

    #[tokio::test]
    async fn test_month_report_commands() {
        let may = Month::new(5).unwrap();
        let env = TestEnv::with_records(&may_example()).await;
        let root = env.config().root().to_path_buf();

        let out = statistics(Config::load(&root).await.unwrap(), may)
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().total_sold_items, 1);

        let out = bar_chart(Config::load(&root).await.unwrap(), may)
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().len(), 10);

        let out = pie_chart(Config::load(&root).await.unwrap(), may)
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().len(), 2);

        let out = combined(Config::load(&root).await.unwrap(), may)
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().transactions.len(), 2);
    }
}
