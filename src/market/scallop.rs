use serde::Deserialize;

use crate::model::{PoolCollection, RawPool};

use super::MarketError;

// ── API response types ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MarketResponse {
    #[serde(default)]
    pools: PoolCollection,
}

// ── Indexer client ───────────────────────────────────────────────────

/// Scallop market indexer: aggregated pool state for every listed asset.
pub struct ScallopIndexer {
    http: reqwest::Client,
    market_url: String,
}

impl ScallopIndexer {
    pub fn new(http: reqwest::Client, market_url: impl Into<String>) -> Self {
        ScallopIndexer {
            http,
            market_url: market_url.into(),
        }
    }

    pub async fn fetch_pools(&self) -> Result<Vec<RawPool>, MarketError> {
        let query = |source| MarketError::Query {
            url: self.market_url.clone(),
            source,
        };
        let response: MarketResponse = self
            .http
            .get(&self.market_url)
            .send()
            .await
            .map_err(query)?
            .error_for_status()
            .map_err(query)?
            .json()
            .await
            .map_err(query)?;
        Ok(response.pools.into_pools())
    }
}
