use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_ADDRESS_ID: &str = "67c44a103fe1b8c454eb9699";
const DEFAULT_MARKET_URL: &str = "https://sdk.api.scallop.io/api/market/migrate";
const DEFAULT_HERMES_URL: &str = "https://hermes.pyth.network";
const DEFAULT_UPSTREAM: &str = "https://fullnode.mainnet.sui.io";

/// Assets with no reliable price or protocol support. Never shown, never actionable.
pub const EXCLUDED_SYMBOLS: &[&str] = &["BLUB", "FUD", "sbwBTC", "wAPT", "wETH", "wBTC"];

/// Sui network the protocol client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    /// Identifier returned by `sui_getChainIdentifier` for the public networks.
    /// Devnet is wiped regularly and localnet is arbitrary, so neither is pinned.
    pub fn chain_identifier(&self) -> Option<&'static str> {
        match self {
            Network::Mainnet => Some("35834a8a"),
            Network::Testnet => Some("4c78adac"),
            Network::Devnet | Network::Localnet => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        };
        f.write_str(name)
    }
}

/// Top-level configuration. Every field has a default matching the public
/// mainnet deployment, so an empty JSON object is a valid config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: Network,
    /// Protocol address-registry id.
    pub address_id: String,
    /// Sui JSON-RPC endpoint. Unset means the local forwarder, wherever
    /// `proxy` puts it.
    pub rpc_url: Option<String>,
    /// Market-state indexer endpoint.
    pub market_url: String,
    pub prices: PriceFeedConfig,
    /// Symbols dropped from every market fetch.
    pub excluded_symbols: Vec<String>,
    /// Reject an RPC endpoint whose chain identifier doesn't match `network`.
    pub verify_chain: bool,
    pub proxy: ProxyConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            network: Network::Mainnet,
            address_id: DEFAULT_ADDRESS_ID.to_string(),
            rpc_url: None,
            market_url: DEFAULT_MARKET_URL.to_string(),
            prices: PriceFeedConfig::default(),
            excluded_symbols: EXCLUDED_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            verify_chain: true,
            proxy: ProxyConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(AppConfig::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Node endpoint the protocol client dials.
    pub fn node_url(&self) -> String {
        self.rpc_url.clone().unwrap_or_else(|| self.local_rpc_url())
    }

    /// The local forwarder's URL for the current `proxy` settings.
    /// Wildcard bind addresses are dialled as `localhost`.
    pub fn local_rpc_url(&self) -> String {
        let host = match self.proxy.host.as_str() {
            "" | "0.0.0.0" | "::" | "[::]" => "localhost".to_string(),
            h if h.contains(':') && !h.starts_with('[') => format!("[{h}]"),
            h => h.to_string(),
        };
        let prefix = self.proxy.prefix.trim_matches('/');
        format!("http://{host}:{}/{prefix}", self.proxy.port)
    }

    pub fn is_excluded(&self, symbol: &str) -> bool {
        self.excluded_symbols.iter().any(|s| s == symbol)
    }
}

/// Pyth Hermes price source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceFeedConfig {
    pub hermes_url: String,
    /// Display symbol → Pyth price feed id (hex, with or without `0x`).
    pub feeds: BTreeMap<String, String>,
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        let feeds = [
            ("SUI", "0x23d7315113f5b1d3ba7a83604c44b94d79f4fd69af77f804fc7f920a6dc65744"),
            ("USDC", "0xeaa020c61cc479712813461ce153894a96a6c00b21ed0cfc2798d1f9a9e9c94a"),
            ("USDT", "0x2b89b9dc8fdf9f34709a5b106b472f0f39bb6ca9ce04b0fd7f2e971688e2e53b"),
            ("ETH", "0xff61491a931112ddf1bd8147cd1b641375f79f5825126d665480874634fd0ace"),
            ("BTC", "0xe62df6c8b4a85fe1a67db44dc12de5db330f7ac66b72dc658afedf0f4a415b43"),
        ]
        .into_iter()
        .map(|(symbol, id)| (symbol.to_string(), id.to_string()))
        .collect();

        PriceFeedConfig {
            hermes_url: DEFAULT_HERMES_URL.to_string(),
            feeds,
        }
    }
}

/// Local forwarder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    /// Local path prefix stripped before forwarding.
    pub prefix: String,
    pub upstream: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        ProxyConfig {
            host: "127.0.0.1".to_string(),
            port: 5001,
            prefix: "/sui".to_string(),
            upstream: DEFAULT_UPSTREAM.to_string(),
        }
    }
}
