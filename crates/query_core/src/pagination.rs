use std::future::Future;

use shared::domain::{PageRequest, MAX_PAGE_SIZE};
use tracing::{debug, info};

/// Page size used for every request of one aggregation.
pub fn page_size_for(target_limit: usize) -> usize {
    target_limit.clamp(1, MAX_PAGE_SIZE)
}

/// Fetches pages one after another until a page comes back empty or the
/// accumulated count exceeds `target_limit`.
///
/// The page size stays fixed for the whole run, so the result may overshoot
/// `target_limit` by up to one page; callers that need an exact cap truncate
/// it themselves. At least one page is always requested. A failed fetch ends
/// the aggregation and the records gathered so far are dropped.
pub async fn aggregate<T, E, F, Fut>(mut fetch_page: F, target_limit: usize) -> Result<Vec<T>, E>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let page_size = page_size_for(target_limit);
    let mut records = Vec::new();
    let mut pages = 0usize;

    loop {
        let request = PageRequest {
            offset: records.len(),
            limit: page_size,
        };
        let page = fetch_page(request).await?;
        pages += 1;

        let fetched = page.len();
        records.extend(page);
        debug!(
            offset = request.offset,
            limit = page_size,
            fetched,
            total = records.len(),
            "fetched page"
        );

        if fetched == 0 || records.len() > target_limit {
            break;
        }
    }

    info!(pages, total = records.len(), target_limit, "aggregation finished");
    Ok(records)
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
