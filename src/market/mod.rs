pub mod board;
pub mod pyth;
pub mod scallop;

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::model::{MarketRow, RawPool};

pub use board::{FetchTicket, MarketBoard};

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("market query to {url} failed: {source}")]
    Query {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("protocol client unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum PriceFeedError {
    #[error("price feed request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("no price feeds configured")]
    NotConfigured,
}

/// The lending protocol's market-state and price-feed queries.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Raw pool records, one per asset.
    async fn query_pools(&self) -> Result<Vec<RawPool>, MarketError>;

    /// Display symbol → USD price.
    async fn query_prices(&self) -> Result<HashMap<String, f64>, PriceFeedError>;
}

/// Whether the price feed contributed to a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PriceFeedStatus {
    Live { quotes: usize },
    Unavailable { reason: String },
}

/// Result of one successful market fetch.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub rows: Vec<MarketRow>,
    /// Symbols dropped by the exclusion set.
    pub excluded: Vec<String>,
    /// Records without a coin type or name, plus duplicate coin types.
    pub skipped: usize,
    pub price_feed: PriceFeedStatus,
    pub fetched_at: DateTime<Utc>,
}

/// Output of [`normalize_pools`].
#[derive(Debug, Default)]
pub struct Normalized {
    pub rows: Vec<MarketRow>,
    pub excluded: Vec<String>,
    pub skipped: usize,
}

/// Resolve raw pools into display rows, dropping excluded symbols and
/// keeping only the first record per coin type.
pub fn normalize_pools(
    pools: &[RawPool],
    prices: &HashMap<String, f64>,
    excluded_symbols: &[String],
) -> Normalized {
    let mut out = Normalized::default();
    let mut seen: HashSet<String> = HashSet::new();

    for raw in pools {
        let Some(row) = MarketRow::from_raw(raw, prices) else {
            debug!(coin_name = ?raw.coin_name, "pool record has no coin type or name, skipping");
            out.skipped += 1;
            continue;
        };
        if excluded_symbols.iter().any(|s| *s == row.symbol) {
            out.excluded.push(row.symbol);
            continue;
        }
        if !seen.insert(row.coin_type.clone()) {
            warn!(coin_type = %row.coin_type, "duplicate pool for coin type, keeping first");
            out.skipped += 1;
            continue;
        }
        out.rows.push(row);
    }

    out
}

/// Fetch and normalize, reporting failures as typed errors.
///
/// A price-feed failure is not an error: rows fall back to pool-reported
/// prices and the snapshot records why the feed was skipped.
pub async fn try_fetch_market_assets(
    source: &dyn MarketSource,
    excluded_symbols: &[String],
) -> Result<MarketSnapshot, MarketError> {
    let pools = source.query_pools().await?;

    let (prices, price_feed) = match source.query_prices().await {
        Ok(prices) => {
            let quotes = prices.len();
            (prices, PriceFeedStatus::Live { quotes })
        }
        Err(e) => {
            debug!(error = %e, "price feed unavailable, using pool prices");
            (
                HashMap::new(),
                PriceFeedStatus::Unavailable {
                    reason: e.to_string(),
                },
            )
        }
    };

    let normalized = normalize_pools(&pools, &prices, excluded_symbols);
    debug!(
        rows = normalized.rows.len(),
        excluded = normalized.excluded.len(),
        skipped = normalized.skipped,
        "market snapshot assembled"
    );

    Ok(MarketSnapshot {
        rows: normalized.rows,
        excluded: normalized.excluded,
        skipped: normalized.skipped,
        price_feed,
        fetched_at: Utc::now(),
    })
}

/// Market rows for display; empty when the market-state query fails.
pub async fn fetch_market_assets(
    source: &dyn MarketSource,
    excluded_symbols: &[String],
) -> Vec<MarketRow> {
    match try_fetch_market_assets(source, excluded_symbols).await {
        Ok(snapshot) => snapshot.rows,
        Err(e) => {
            error!(error = %e, "market fetch failed");
            Vec::new()
        }
    }
}
