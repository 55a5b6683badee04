use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::error::SourceError;

/// Anything that can produce a current USD price for an asset.
/// The monitor only talks to this trait so tests can swap in a
/// scripted source instead of the live API.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_usd_price(&self, asset: &str) -> Result<f64, SourceError>;
}

#[derive(Clone)]
pub struct CoinGeckoClient {
    http: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl CoinGeckoClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key,
            timeout,
        }
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn fetch_usd_price(&self, asset: &str) -> Result<f64, SourceError> {
        let url = format!("{}/simple/price", self.base_url.trim_end_matches('/'));

        let mut req = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .query(&[("ids", asset), ("vs_currencies", "usd")]);

        if self.has_key() {
            req = req.header("x-cg-demo-api-key", self.api_key.as_str());
        }

        let res = req.send().await.map_err(|e| SourceError::Network(e.to_string()))?;

        if res.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(SourceError::Network(format!(
                "price request failed: {status} {body}"
            )));
        }

        // {"ethereum": {"usd": 2593.21}}
        let parsed = res
            .json::<HashMap<String, HashMap<String, f64>>>()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        parsed
            .get(asset)
            .and_then(|quotes| quotes.get("usd"))
            .copied()
            .ok_or_else(|| SourceError::UnknownAsset(asset.to_string()))
    }
}
