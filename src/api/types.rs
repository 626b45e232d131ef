use serde::{Deserialize, Serialize};

use crate::market::PriceFeedStatus;
use crate::model::MarketRow;

// ── Request types ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BalanceQuery {
    pub address: String,
    pub coin_type: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_decimals() -> u8 {
    crate::model::market::DEFAULT_DECIMALS
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MarketsResponse {
    /// Fetch sequence number of `rows`.
    pub seq: u64,
    /// This request's own fetch was superseded by a newer one.
    pub superseded: bool,
    pub rows: Vec<MarketRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_feed: Option<PriceFeedStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub address: String,
    pub coin_type: String,
    pub balance: f64,
}
