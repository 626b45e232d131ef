use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use tracing::debug;

use super::PriceFeedError;

// ── API response types ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LatestPriceResponse {
    #[serde(default)]
    parsed: Vec<ParsedPriceUpdate>,
}

#[derive(Debug, Deserialize)]
struct ParsedPriceUpdate {
    id: String,
    price: PriceQuote,
}

#[derive(Debug, Deserialize)]
struct PriceQuote {
    price: String,
    expo: i32,
}

// ── Hermes client ────────────────────────────────────────────────────

/// Pyth Hermes latest-price source for a fixed symbol → feed-id table.
pub struct PythHermes {
    http: reqwest::Client,
    base_url: String,
    /// Normalized feed id → display symbol.
    symbols_by_feed: HashMap<String, String>,
}

impl PythHermes {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        feeds: &BTreeMap<String, String>,
    ) -> Self {
        let symbols_by_feed = feeds
            .iter()
            .map(|(symbol, id)| (normalize_feed_id(id), symbol.clone()))
            .collect();
        PythHermes {
            http,
            base_url: base_url.into(),
            symbols_by_feed,
        }
    }

    /// Symbol → USD price for every configured feed Hermes answered.
    pub async fn latest_prices(&self) -> Result<HashMap<String, f64>, PriceFeedError> {
        if self.symbols_by_feed.is_empty() {
            return Err(PriceFeedError::NotConfigured);
        }

        let url = format!(
            "{}/v2/updates/price/latest",
            self.base_url.trim_end_matches('/')
        );
        let mut query: Vec<(&str, &str)> = self
            .symbols_by_feed
            .keys()
            .map(|id| ("ids[]", id.as_str()))
            .collect();
        query.push(("parsed", "true"));

        let request = |source| PriceFeedError::Request {
            url: url.clone(),
            source,
        };
        let response: LatestPriceResponse = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(request)?
            .error_for_status()
            .map_err(request)?
            .json()
            .await
            .map_err(request)?;

        let prices: HashMap<String, f64> = response
            .parsed
            .into_iter()
            .filter_map(|update| {
                let symbol = self.symbols_by_feed.get(&normalize_feed_id(&update.id))?;
                let price = scale_price(&update.price)?;
                Some((symbol.clone(), price))
            })
            .collect();

        debug!(quotes = prices.len(), "fetched pyth prices");
        Ok(prices)
    }
}

fn normalize_feed_id(id: &str) -> String {
    id.trim().trim_start_matches("0x").to_ascii_lowercase()
}

/// `price * 10^expo`; `None` for unparseable or non-positive quotes.
fn scale_price(quote: &PriceQuote) -> Option<f64> {
    let mantissa: i64 = quote.price.parse().ok()?;
    let price = if quote.expo < 0 {
        mantissa as f64 / 10f64.powi(-quote.expo)
    } else {
        mantissa as f64 * 10f64.powi(quote.expo)
    };
    (price.is_finite() && price > 0.0).then_some(price)
}
