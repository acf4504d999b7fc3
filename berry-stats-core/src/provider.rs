use crate::record::BerryRecord;
use berry_stats_common::{BerryStatsError, ProviderConfig, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// lightweight listing entry pointing at a berry detail document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BerryRef {
    pub name: String,
    #[serde(alias = "url")]
    pub detail_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingPage {
    /// total number of berries the provider reports, not the page length
    pub count: usize,
    pub results: Vec<BerryRef>,
}

/// source of berry data; any paginated listing + detail lookup fits
pub trait BerryProvider: Sync {
    fn list_page(&self, offset: usize, limit: usize) -> Result<ListingPage>;
    fn get_detail(&self, reference: &BerryRef) -> Result<BerryRecord>;
}

/// PokeAPI-compatible provider over blocking HTTP
pub struct PokeApiProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl PokeApiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BerryStatsError::ProviderUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn listing_url(&self, offset: usize, limit: usize) -> String {
        format!("{}/berry?offset={offset}&limit={limit}", self.base_url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| BerryStatsError::ProviderUnavailable(format!("GET {url}: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(BerryStatsError::ProviderUnavailable(format!(
                "GET {url} returned HTTP {status}"
            )));
        }
        let body = resp
            .text()
            .map_err(|e| BerryStatsError::ProviderUnavailable(format!("GET {url}: {e}")))?;
        serde_json::from_str(&body)
            .map_err(|e| BerryStatsError::ProviderData(format!("{url}: {e}")))
    }
}

impl BerryProvider for PokeApiProvider {
    fn list_page(&self, offset: usize, limit: usize) -> Result<ListingPage> {
        self.get_json(&self.listing_url(offset, limit))
    }

    fn get_detail(&self, reference: &BerryRef) -> Result<BerryRecord> {
        self.get_json(&reference.detail_url)
    }
}
