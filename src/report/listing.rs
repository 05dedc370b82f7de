use crate::error::Res;
use crate::model::{Listing, Month, PageRequest};
use crate::store::{Store, TransactionFilter};
use tracing::debug;

/// Returns one page of the records matching `month` and `search`, in ascending `id` order,
/// along with the total number of matches. Without a month every date matches; a blank search
/// matches everything.
pub async fn listing(
    store: &dyn Store,
    month: Option<Month>,
    search: Option<&str>,
    page: PageRequest,
) -> Res<Listing> {
    let filter = TransactionFilter::new()
        .with_month(month)
        .with_search(search);
    debug!("Listing {filter:?} {page:?}");
    let (transactions, total) =
        tokio::try_join!(store.find(&filter, Some(page)), store.count(&filter))?;
    Ok(Listing {
        transactions,
        total,
        page: page.page(),
        per_page: page.per_page(),
    })
}
