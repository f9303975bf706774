use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
use tokio::time;

use crate::error::{Error, Result};
use crate::models::district::District;
use crate::models::record::RawRentRecord;
use crate::pipeline::CancelFlag;
use crate::seoul::RentPage;

/// The open-data API rejects windows wider than 1000 records per call.
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Seam between the collector and the HTTP client, so the page loop is
/// testable without the network.
#[async_trait]
pub trait PageFetcher {
    async fn fetch_page(&self, district: &District, start: u64, end: u64) -> Result<RentPage>;
}

/// What to do when a single page call fails mid-collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagePolicy {
    /// Skip the failed page with a warning and keep going. The result is
    /// incomplete but usable.
    #[default]
    BestEffort,
    /// Abort the collection with the page's error.
    FailFast,
}

/// 1-based inclusive `(start, end)` windows covering `total_count` records.
/// The last page is strictly shorter when the count is not a multiple of
/// `page_size`.
pub fn page_plan(total_count: u64, page_size: u64) -> Vec<(u64, u64)> {
    let mut pages = Vec::new();
    let mut start = 1;

    while start <= total_count {
        let end = (start + page_size - 1).min(total_count);
        pages.push((start, end));
        start = end + 1;
    }

    pages
}

/*
   Probes the district for its total record count, then walks the page plan
   sequentially with a fixed delay between calls. A zero total aborts with
   EmptyResult; a failed page is handled per `policy`. The cancel flag is
   checked before every page.
*/
pub async fn collect_all<F>(
    fetcher: &F,
    district: &District,
    page_size: u64,
    delay: Duration,
    policy: PagePolicy,
    cancel: &CancelFlag,
    mut on_progress: impl FnMut(u64, u64),
) -> Result<Vec<RawRentRecord>>
where
    F: PageFetcher + Sync,
{
    let page_size = if page_size == 0 || page_size > MAX_PAGE_SIZE {
        warn!(
            "Page size {} outside 1..={}, clamping",
            page_size, MAX_PAGE_SIZE
        );
        page_size.clamp(1, MAX_PAGE_SIZE)
    } else {
        page_size
    };

    // The probe always fails fast: without a total count there is no plan.
    let probe = fetcher.fetch_page(district, 1, 1).await?;
    if probe.total_count == 0 {
        return Err(Error::EmptyResult(format!(
            "no rental records for {}",
            district.name
        )));
    }

    let plan = page_plan(probe.total_count, page_size);
    let total_pages = plan.len() as u64;
    info!(
        "Collecting {} records for {} across {} pages",
        probe.total_count, district.name, total_pages
    );

    let mut records: Vec<RawRentRecord> = Vec::with_capacity(probe.total_count as usize);

    for (index, (start, end)) in plan.iter().enumerate() {
        if cancel.load(Ordering::Acquire) {
            return Err(Error::Cancelled);
        }

        if index > 0 {
            time::sleep(delay).await;
        }

        match fetcher.fetch_page(district, *start, *end).await {
            Ok(page) => records.extend(page.rows),
            Err(err) => match policy {
                PagePolicy::FailFast => return Err(err),
                PagePolicy::BestEffort => {
                    warn!(
                        "Skipping page {}..{} for {}: {}",
                        start, end, district.name, err
                    );
                }
            },
        }

        on_progress(index as u64 + 1, total_pages);
    }

    Ok(records)
}
