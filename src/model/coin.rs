use alloy::primitives::U256;

/// One discrete coin object held by an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinHolding {
    pub coin_type: String,
    /// Balance in base units.
    pub raw_balance: U256,
}

impl CoinHolding {
    pub fn new(coin_type: impl Into<String>, raw_balance: impl Into<U256>) -> Self {
        CoinHolding {
            coin_type: coin_type.into(),
            raw_balance: raw_balance.into(),
        }
    }
}
