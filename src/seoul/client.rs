use std::time::Duration;

use async_trait::async_trait;
use log::info;
use serde::Deserialize;
use serde_json::Value;
use serde_this_or_that::as_u64;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::district::District;
use crate::models::record::RawRentRecord;
use crate::pipeline::collector::PageFetcher;

const DEFAULT_BASE_URL: &str = "http://openapi.seoul.go.kr:8088";

/// One page of rental records plus the dataset-wide total count the API
/// reports alongside every page.
#[derive(Debug, Clone)]
pub struct RentPage {
    pub rows: Vec<RawRentRecord>,
    pub total_count: u64,
}

/*
   Inner body of the open-data response, nested under the dataset name.
   `list_total_count` arrives as a number or a string depending on the
   endpoint, and both fields are absent on some error bodies.
*/
#[derive(Debug, Deserialize)]
struct RentDataBody {
    #[serde(default, deserialize_with = "as_u64")]
    list_total_count: u64,
    #[serde(default)]
    row: Vec<RawRentRecord>,
}

pub struct SeoulRentClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    dataset_name: String,
    contract_year: u32,
    page_cache: TtlCache<(String, String, u64, u64), RentPage>,
}

impl SeoulRentClient {
    pub fn new(config: &Config) -> SeoulRentClient {
        SeoulRentClient {
            client: reqwest::Client::new(),
            base_url: config
                .seoul_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: config.seoul_api_key.clone(),
            dataset_name: config.dataset_name.clone(),
            contract_year: config.contract_year,
            page_cache: TtlCache::new(Duration::from_secs(config.cache_ttl_seconds)),
        }
    }

    /*
       Fetches one page of rental records for a district. `start` and `end`
       are 1-based and inclusive; the caller's page plan keeps the window
       within the API's per-call maximum. Successful pages are memoized for
       the configured TTL.
    */
    pub async fn fetch_rent_page(
        &self,
        district: &District,
        start: u64,
        end: u64,
    ) -> Result<RentPage> {
        let key = (district.code.clone(), district.name.clone(), start, end);

        self.page_cache
            .get_or_compute(key, || self.fetch_uncached(district, start, end))
            .await
    }

    async fn fetch_uncached(&self, district: &District, start: u64, end: u64) -> Result<RentPage> {
        info!(
            "Fetching rent records {}..{} for {}",
            start, end, district.name
        );

        let url = format!(
            "{}/{}/json/{}/{}/{}/{}/{}/{}",
            self.base_url,
            self.api_key,
            self.dataset_name,
            start,
            end,
            self.contract_year,
            district.code,
            district.name
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "rent-data API returned {} for {}",
                response.status(),
                district.name
            )));
        }

        let body: Value = response.json().await?;
        let dataset = body.get(&self.dataset_name).ok_or_else(|| {
            Error::Parse(format!(
                "rent-data response has no '{}' body",
                self.dataset_name
            ))
        })?;

        let body: RentDataBody = serde_json::from_value(dataset.clone())
            .map_err(|e| Error::Parse(format!("malformed rent-data body: {e}")))?;

        Ok(RentPage {
            rows: body.row,
            total_count: body.list_total_count,
        })
    }
}

#[async_trait]
impl PageFetcher for SeoulRentClient {
    async fn fetch_page(&self, district: &District, start: u64, end: u64) -> Result<RentPage> {
        self.fetch_rent_page(district, start, end).await
    }
}
