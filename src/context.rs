use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::balance::{self, BalanceError, CoinInventory};
use crate::config::AppConfig;
use crate::market::pyth::PythHermes;
use crate::market::scallop::ScallopIndexer;
use crate::market::{self, MarketError, MarketSnapshot, MarketSource, PriceFeedError};
use crate::model::{CoinHolding, MarketRow, RawPool};
use crate::rpc::{RpcError, SuiRpc};

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("RPC endpoint {url} serves chain {actual}, expected {expected} ({network})")]
    WrongChain {
        url: String,
        network: String,
        expected: String,
        actual: String,
    },
}

/// Connected protocol client: node RPC, market indexer and price feed.
pub struct ProtocolClient {
    rpc: SuiRpc,
    indexer: ScallopIndexer,
    prices: PythHermes,
}

impl ProtocolClient {
    /// Connect to the configured node, checking it serves the configured network.
    pub async fn connect(config: &AppConfig, http: reqwest::Client) -> Result<Self, ConnectError> {
        let rpc_url = config.node_url();
        let rpc = SuiRpc::new(http.clone(), rpc_url.clone());
        let chain_id = rpc.chain_identifier().await?;

        if config.verify_chain {
            if let Some(expected) = config.network.chain_identifier() {
                if chain_id != expected {
                    return Err(ConnectError::WrongChain {
                        url: rpc_url,
                        network: config.network.to_string(),
                        expected: expected.to_string(),
                        actual: chain_id,
                    });
                }
            }
        }

        info!(
            rpc = %rpc_url,
            network = %config.network,
            chain_id = %chain_id,
            address_id = %config.address_id,
            "protocol client connected"
        );

        Ok(ProtocolClient {
            rpc,
            indexer: ScallopIndexer::new(http.clone(), config.market_url.clone()),
            prices: PythHermes::new(http, config.prices.hermes_url.clone(), &config.prices.feeds),
        })
    }
}

#[async_trait]
impl MarketSource for ProtocolClient {
    async fn query_pools(&self) -> Result<Vec<RawPool>, MarketError> {
        self.indexer.fetch_pools().await
    }

    async fn query_prices(&self) -> Result<HashMap<String, f64>, PriceFeedError> {
        self.prices.latest_prices().await
    }
}

#[async_trait]
impl CoinInventory for ProtocolClient {
    async fn coins(&self, owner: &str) -> Result<Vec<CoinHolding>, BalanceError> {
        self.rpc.coins(owner).await
    }
}

/// Application context, built once at startup and shared by reference.
///
/// The protocol client is connected on first use. Concurrent first callers
/// wait on the same connection attempt; a failed attempt leaves the cell
/// empty so the next caller retries.
pub struct ProtocolContext {
    config: AppConfig,
    http: reqwest::Client,
    client: OnceCell<Arc<ProtocolClient>>,
}

impl ProtocolContext {
    pub fn new(config: AppConfig) -> Self {
        Self::with_http(config, reqwest::Client::new())
    }

    pub fn with_http(config: AppConfig, http: reqwest::Client) -> Self {
        ProtocolContext {
            config,
            http,
            client: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub async fn client(&self) -> Result<Arc<ProtocolClient>, ConnectError> {
        let client = self
            .client
            .get_or_try_init(|| async {
                ProtocolClient::connect(&self.config, self.http.clone())
                    .await
                    .map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(client))
    }

    pub async fn try_fetch_market_assets(&self) -> Result<MarketSnapshot, MarketError> {
        let client = self
            .client()
            .await
            .map_err(|e| MarketError::Unavailable(e.to_string()))?;
        market::try_fetch_market_assets(client.as_ref(), &self.config.excluded_symbols).await
    }

    /// Market rows for display; empty on any failure.
    pub async fn fetch_market_assets(&self) -> Vec<MarketRow> {
        match self.try_fetch_market_assets().await {
            Ok(snapshot) => snapshot.rows,
            Err(e) => {
                warn!(error = %e, "market fetch failed");
                Vec::new()
            }
        }
    }

    /// Display balance; 0 on any failure.
    pub async fn lookup_balance(&self, owner: &str, coin_type: &str, decimals: u8) -> f64 {
        match self.client().await {
            Ok(client) => balance::lookup_balance(client.as_ref(), owner, coin_type, decimals).await,
            Err(e) => {
                warn!(owner, coin_type, error = %e, "protocol client unavailable, balance treated as zero");
                0.0
            }
        }
    }
}
