pub mod action;
pub mod coin;
pub mod market;
pub mod receipt;
mod serde_helpers;

pub use action::{ActionArgs, LendingAction, LendingCall, TransactionResult};
pub use coin::CoinHolding;
pub use market::{AssetInfo, MarketRow, PoolCollection, RawPool};
pub use receipt::{ExecutionReceipt, ExecutionStatus, TransactionEffects};
