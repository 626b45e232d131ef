use alloy::primitives::U256;
use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::model::CoinHolding;
use crate::rpc::{RpcError, SuiRpc};
use crate::units;

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("coin inventory for {owner} unavailable: {source}")]
    Inventory {
        owner: String,
        #[source]
        source: RpcError,
    },
}

/// Source of an address's coin holdings.
#[async_trait]
pub trait CoinInventory: Send + Sync {
    async fn coins(&self, owner: &str) -> Result<Vec<CoinHolding>, BalanceError>;
}

#[async_trait]
impl CoinInventory for SuiRpc {
    async fn coins(&self, owner: &str) -> Result<Vec<CoinHolding>, BalanceError> {
        self.get_all_coins(owner)
            .await
            .map_err(|source| BalanceError::Inventory {
                owner: owner.to_string(),
                source,
            })
    }
}

/// Sum every coin object of `coin_type` and scale to display units.
pub fn get_coin_balance(coins: &[CoinHolding], coin_type: &str, decimals: u8) -> f64 {
    let target = normalize_coin_type(coin_type);
    let total = coins
        .iter()
        .filter(|coin| normalize_coin_type(&coin.coin_type) == target)
        .fold(U256::ZERO, |acc, coin| acc.saturating_add(coin.raw_balance));
    units::from_base_units(total, decimals)
}

pub async fn try_lookup_balance(
    inventory: &dyn CoinInventory,
    owner: &str,
    coin_type: &str,
    decimals: u8,
) -> Result<f64, BalanceError> {
    let coins = inventory.coins(owner).await?;
    Ok(get_coin_balance(&coins, coin_type, decimals))
}

/// Display balance of `coin_type` held by `owner`; 0 when the lookup fails.
pub async fn lookup_balance(
    inventory: &dyn CoinInventory,
    owner: &str,
    coin_type: &str,
    decimals: u8,
) -> f64 {
    match try_lookup_balance(inventory, owner, coin_type, decimals).await {
        Ok(balance) => balance,
        Err(e) => {
            warn!(owner, coin_type, error = %e, "balance lookup failed, treating as zero");
            0.0
        }
    }
}

/// Canonical form of a Move type tag for comparison: every `0x`-prefixed
/// address loses its leading zeros and is lowercased, so `0x2::sui::SUI`
/// and `0x0000…0002::sui::SUI` compare equal.
pub fn normalize_coin_type(coin_type: &str) -> String {
    let mut out = String::with_capacity(coin_type.len());
    let mut rest = coin_type.trim();

    while let Some(pos) = rest.find("0x") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let hex_len = after
            .find(|c: char| !c.is_ascii_hexdigit())
            .unwrap_or(after.len());
        let hex = after[..hex_len].trim_start_matches('0');
        out.push_str("0x");
        if hex.is_empty() {
            out.push('0');
        } else {
            out.push_str(&hex.to_ascii_lowercase());
        }
        rest = &after[hex_len..];
    }
    out.push_str(rest);
    out
}
