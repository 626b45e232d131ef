use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::serde_helpers::{opt_f64, opt_u8};

/// Decimals assumed when a pool record doesn't report `coinDecimal`.
pub const DEFAULT_DECIMALS: u8 = 9;

/// One pool record as the market-state source reports it. Every field may be
/// absent; fallbacks are applied once, in [`MarketRow::from_raw`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPool {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub coin_name: Option<String>,
    #[serde(default)]
    pub coin_type: Option<String>,
    #[serde(default, deserialize_with = "opt_u8")]
    pub coin_decimal: Option<u8>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub coin_price: Option<f64>,
    /// Raw integer amount in base units.
    #[serde(default, deserialize_with = "opt_f64")]
    pub supply_amount: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub borrow_amount: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub supply_apy: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub supply_apr: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub borrow_apy: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub borrow_apr: Option<f64>,
}

/// Pools keyed by pool id (or coin name). Indexer versions disagree on
/// whether this is an object or an array; both normalize to a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PoolCollection {
    Keyed(HashMap<String, RawPool>),
    Listed(Vec<RawPool>),
}

impl Default for PoolCollection {
    fn default() -> Self {
        PoolCollection::Listed(Vec::new())
    }
}

impl PoolCollection {
    pub fn into_pools(self) -> Vec<RawPool> {
        match self {
            PoolCollection::Keyed(map) => map.into_values().collect(),
            PoolCollection::Listed(list) => list,
        }
    }
}

/// Fully resolved per-asset display record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketRow {
    pub symbol: String,
    pub coin_type: String,
    pub decimals: u8,
    /// USD unit price, 0 when no feed covers the asset.
    pub price: f64,
    pub total_supply: f64,
    pub total_borrow: f64,
    /// Percent of supplied liquidity currently borrowed.
    pub utilization: f64,
    /// Percent.
    pub deposit_apy: f64,
    /// Percent.
    pub borrow_apy: f64,
}

impl MarketRow {
    /// Resolve a raw pool record against a symbol → USD price map.
    ///
    /// Returns `None` when the record carries neither a coin type nor any
    /// name to display it under.
    pub fn from_raw(raw: &RawPool, prices: &HashMap<String, f64>) -> Option<Self> {
        let coin_type = raw.coin_type.clone().filter(|t| !t.is_empty())?;
        let symbol = raw
            .symbol
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| raw.coin_name.clone().filter(|s| !s.is_empty()))?;

        let price = prices
            .get(&symbol)
            .copied()
            .filter(|p| p.is_finite() && *p > 0.0)
            .or(raw.coin_price.filter(|p| p.is_finite() && *p > 0.0))
            .unwrap_or(0.0);

        let decimals = raw.coin_decimal.unwrap_or(DEFAULT_DECIMALS);
        let scale = 10f64.powi(decimals as i32);
        let total_supply = finite_or_zero(raw.supply_amount) / scale;
        let total_borrow = finite_or_zero(raw.borrow_amount) / scale;
        let utilization = if total_supply > 0.0 {
            total_borrow / total_supply * 100.0
        } else {
            0.0
        };

        Some(MarketRow {
            symbol,
            coin_type,
            decimals,
            price,
            total_supply,
            total_borrow,
            utilization,
            deposit_apy: finite_or_zero(raw.supply_apy.or(raw.supply_apr)) * 100.0,
            borrow_apy: finite_or_zero(raw.borrow_apy.or(raw.borrow_apr)) * 100.0,
        })
    }

    pub fn asset_info(&self) -> AssetInfo {
        AssetInfo {
            symbol: self.symbol.clone(),
            coin_type: self.coin_type.clone(),
            decimals: self.decimals,
            price: self.price,
        }
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// The subset of a [`MarketRow`] an action dialog needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    pub symbol: String,
    pub coin_type: String,
    pub decimals: u8,
    pub price: f64,
}
