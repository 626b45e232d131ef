//! Minimal Sui JSON-RPC client: the two read calls this crate needs.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::CoinHolding;
use crate::units;

/// Page size for `suix_getAllCoins` (the node caps it at 50).
const COIN_PAGE_SIZE: u32 = 50;
/// Upper bound on pages walked for one address.
const MAX_COIN_PAGES: usize = 100;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} returned error {code}: {message}")]
    Remote {
        method: String,
        code: i64,
        message: String,
    },
    #[error("{method} returned no result")]
    EmptyResult { method: String },
    #[error("decoding {method} result: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{owner} holds more than {pages} pages of coin objects")]
    CoinPageLimit { owner: String, pages: usize },
    #[error("malformed coin balance: {0}")]
    Balance(#[from] units::UnitsError),
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinPage {
    data: Vec<CoinObject>,
    next_cursor: Option<String>,
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinObject {
    coin_type: String,
    balance: String,
}

pub struct SuiRpc {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl SuiRpc {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        SuiRpc {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Issue one JSON-RPC 2.0 call and decode its `result`.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let transport = |source| RpcError::Transport {
            url: self.url.clone(),
            source,
        };
        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?
            .json()
            .await
            .map_err(transport)?;

        if let Some(err) = response.error {
            return Err(RpcError::Remote {
                method: method.to_string(),
                code: err.code,
                message: err.message,
            });
        }
        let result = response.result.ok_or_else(|| RpcError::EmptyResult {
            method: method.to_string(),
        })?;
        serde_json::from_value(result).map_err(|source| RpcError::Decode {
            method: method.to_string(),
            source,
        })
    }

    pub async fn chain_identifier(&self) -> Result<String, RpcError> {
        self.call("sui_getChainIdentifier", json!([])).await
    }

    /// Every coin object owned by `owner`, across all coin types.
    pub async fn get_all_coins(&self, owner: &str) -> Result<Vec<CoinHolding>, RpcError> {
        let mut holdings = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_COIN_PAGES {
            let page: CoinPage = self
                .call("suix_getAllCoins", json!([owner, cursor, COIN_PAGE_SIZE]))
                .await?;
            for coin in page.data {
                holdings.push(CoinHolding::new(
                    coin.coin_type,
                    units::parse_base_units(&coin.balance)?,
                ));
            }
            if !page.has_next_page || page.next_cursor.is_none() {
                debug!(owner, coins = holdings.len(), "fetched coin inventory");
                return Ok(holdings);
            }
            cursor = page.next_cursor;
        }

        // A partial sum would understate the balance.
        warn!(owner, pages = MAX_COIN_PAGES, "coin inventory exceeds page limit");
        Err(RpcError::CoinPageLimit {
            owner: owner.to_string(),
            pages: MAX_COIN_PAGES,
        })
    }
}
