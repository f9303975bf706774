use async_trait::async_trait;
use log::warn;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;

use crate::config::Config;
use crate::models::record::Coordinate;
use crate::pipeline::enrich::Geocode;

const DEFAULT_BASE_URL: &str = "https://dapi.kakao.com";

/*
   Kakao Local address search. `x` is longitude and `y` latitude, both as
   decimal strings.
*/
#[derive(Debug, Deserialize)]
struct AddressDocument {
    x: String,
    y: String,
}

#[derive(Debug, Deserialize)]
struct AddressSearchResponse {
    documents: Vec<AddressDocument>,
}

pub struct KakaoGeocoder {
    client: reqwest::Client,
    base_url: String,
    rest_api_key: String,
}

impl KakaoGeocoder {
    pub fn new(config: &Config) -> KakaoGeocoder {
        KakaoGeocoder {
            client: reqwest::Client::new(),
            base_url: config
                .kakao_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            rest_api_key: config.kakao_rest_api_key.clone(),
        }
    }
}

#[async_trait]
impl Geocode for KakaoGeocoder {
    /*
       Resolves a lot-number address to a coordinate, taking the first
       document of a non-empty response. One attempt per address; every
       failure mode is a warning and `None`, never an error, so the
       enrichment loop keeps going.
    */
    async fn resolve(&self, address: &str) -> Option<Coordinate> {
        let url = format!("{}/v2/local/search/address.json", self.base_url);

        let mut headers: HeaderMap = HeaderMap::new();
        match HeaderValue::from_str(&format!("KakaoAK {}", self.rest_api_key)) {
            Ok(value) => headers.insert(AUTHORIZATION, value),
            Err(_e) => {
                warn!("Kakao REST API key is not a valid header value");
                return None;
            }
        };

        let response = match self
            .client
            .get(&url)
            .query(&[("query", address)])
            .headers(headers)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Geocoding request failed for '{}': {}", address, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "Address-search API returned {} for '{}'",
                response.status(),
                address
            );
            return None;
        }

        let body: AddressSearchResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Malformed address-search response for '{}': {}", address, e);
                return None;
            }
        };

        let document = match body.documents.first() {
            Some(document) => document,
            None => {
                warn!("No geocoding match for '{}'", address);
                return None;
            }
        };

        match (
            document.y.trim().parse::<f64>(),
            document.x.trim().parse::<f64>(),
        ) {
            (Ok(latitude), Ok(longitude)) => Some(Coordinate {
                latitude,
                longitude,
            }),
            _ => {
                warn!("Unparsable coordinates in geocoding match for '{}'", address);
                None
            }
        }
    }
}
