pub mod collector;
pub mod enrich;
pub mod filter;
pub mod normalize;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use log::info;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::kakao::KakaoGeocoder;
use crate::models::district::District;
use crate::models::record::{RawRentRecord, RentDataset};
use crate::seoul::SeoulRentClient;
use collector::PagePolicy;

/// Set by the caller (Ctrl-C in the binary) and checked between pages and
/// between geocoding calls.
pub type CancelFlag = Arc<AtomicBool>;

/// Incremental progress, reported once per completed page and once per
/// geocoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Page { done: u64, total: u64 },
    Geocode { done: usize, total: usize },
}

/*
   One district query end to end: collect -> normalize -> enrich. The full
   collection is memoized by (code, name, page_size) so re-running an
   unchanged selection within the TTL touches neither API for page data.
*/
pub struct RentPipeline {
    config: Arc<Config>,
    seoul: SeoulRentClient,
    kakao: KakaoGeocoder,
    collection_cache: TtlCache<(String, String, u64), Vec<RawRentRecord>>,
}

impl RentPipeline {
    pub fn new(config: Arc<Config>) -> RentPipeline {
        RentPipeline {
            seoul: SeoulRentClient::new(&config),
            kakao: KakaoGeocoder::new(&config),
            collection_cache: TtlCache::new(Duration::from_secs(config.cache_ttl_seconds)),
            config,
        }
    }

    pub async fn run(
        &self,
        district: &District,
        cancel: &CancelFlag,
        mut on_progress: impl FnMut(Progress),
    ) -> Result<RentDataset> {
        let page_size = self.config.page_size;
        let delay = Duration::from_millis(self.config.page_delay_ms);
        let policy = if self.config.fail_fast {
            PagePolicy::FailFast
        } else {
            PagePolicy::BestEffort
        };

        info!("Starting collection for {} ({})", district.name, district.code);

        let key = (district.code.clone(), district.name.clone(), page_size);
        let rows = self
            .collection_cache
            .get_or_compute(key, || {
                collector::collect_all(
                    &self.seoul,
                    district,
                    page_size,
                    delay,
                    policy,
                    cancel,
                    |done, total| on_progress(Progress::Page { done, total }),
                )
            })
            .await?;

        let records = normalize::normalize(rows, &district.name).ok_or_else(|| {
            Error::EmptyResult(format!("no rental records for {}", district.name))
        })?;

        info!("Geocoding {} records for {}", records.len(), district.name);

        let geocoded = enrich::enrich(&self.kakao, records, cancel, |done, total| {
            on_progress(Progress::Geocode { done, total })
        })
        .await?;

        Ok(RentDataset {
            district: district.clone(),
            records: geocoded,
            collected_at: Local::now(),
        })
    }
}
