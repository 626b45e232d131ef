//! The action dialog's flow: session and amount checks, the deposit
//! balance cap, dispatch, and the status line shown to the user.

use std::sync::Arc;

use thiserror::Error;

use crate::balance::{self, CoinInventory};
use crate::config::Network;
use crate::dispatch::{DispatchError, Dispatcher, interpret_receipt};
use crate::model::{AssetInfo, LendingAction, TransactionResult};
use crate::wallet::{WalletSigner, WalletSigningAdapter};

pub const SUBMITTED_MESSAGE: &str = "Transaction submitted successfully.";
const FAILED_MESSAGE: &str = "Transaction failed.";

/// User-visible reasons an action did not go through.
#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("Please connect your wallet.")]
    WalletNotConnected,
    #[error("Enter a valid amount.")]
    InvalidAmount,
    #[error("Insufficient balance. Max: {max} {symbol}")]
    InsufficientBalance { max: String, symbol: String },
    #[error("{}", .0.as_deref().unwrap_or(FAILED_MESSAGE))]
    TransactionFailed(Option<String>),
}

/// The connected wallet as the dialog sees it.
#[derive(Clone, Default)]
pub struct WalletSession {
    pub connected: bool,
    pub address: Option<String>,
    pub signer: Option<Arc<dyn WalletSigner>>,
    pub network: Network,
}

impl WalletSession {
    pub fn connected(
        address: impl Into<String>,
        signer: Arc<dyn WalletSigner>,
        network: Network,
    ) -> Self {
        WalletSession {
            connected: true,
            address: Some(address.into()),
            signer: Some(signer),
            network,
        }
    }

    fn ready(&self) -> Option<(&str, &Arc<dyn WalletSigner>)> {
        if !self.connected {
            return None;
        }
        let address = self.address.as_deref().filter(|a| !a.is_empty())?;
        Some((address, self.signer.as_ref()?))
    }
}

#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub action: LendingAction,
    pub asset: AssetInfo,
    /// Amount exactly as the user typed it.
    pub amount: String,
}

/// Wallet balance for the dialog's deposit cap; 0 without a connected address.
pub async fn wallet_balance(
    inventory: &dyn CoinInventory,
    session: &WalletSession,
    asset: &AssetInfo,
) -> f64 {
    match session.address.as_deref() {
        Some(address) if session.connected && !address.is_empty() => {
            balance::lookup_balance(inventory, address, &asset.coin_type, asset.decimals).await
        }
        _ => 0.0,
    }
}

/// Parse user input as a finite amount greater than zero.
pub fn parse_amount(input: &str) -> Result<f64, ActionError> {
    match input.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(ActionError::InvalidAmount),
    }
}

/// Value for the "Max" button; `None` disables it.
pub fn max_amount(balance: f64) -> Option<String> {
    (balance > 0.0).then(|| balance.to_string())
}

/// Up to six fraction digits, trailing zeros dropped.
pub fn format_amount(value: f64) -> String {
    let text = format!("{value:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Run one dialog submission. The wallet and amount checks happen before
/// any network call.
pub async fn run_action(
    dispatcher: &Dispatcher,
    session: &WalletSession,
    request: &ActionRequest,
    wallet_balance: f64,
) -> Result<TransactionResult, ActionError> {
    let (address, signer) = session.ready().ok_or(ActionError::WalletNotConnected)?;
    let amount = parse_amount(&request.amount)?;

    if request.action == LendingAction::Deposit && amount > wallet_balance {
        return Err(ActionError::InsufficientBalance {
            max: format_amount(wallet_balance),
            symbol: request.asset.symbol.clone(),
        });
    }

    let adapter = WalletSigningAdapter::new(Arc::clone(signer), address).on_network(session.network);
    let receipt = dispatcher
        .try_execute(
            request.action,
            &adapter,
            &request.asset.coin_type,
            amount,
            request.asset.decimals,
        )
        .await
        .map_err(|e| match e {
            DispatchError::Amount(_) => ActionError::InvalidAmount,
            other => {
                tracing::error!(action = %request.action, error = %other, "lending transaction failed");
                ActionError::TransactionFailed(Some(other.to_string()))
            }
        })?;

    let result = interpret_receipt(request.action, &receipt);
    if result.success {
        Ok(result)
    } else {
        Err(ActionError::TransactionFailed(None))
    }
}

/// Status line for the dialog.
pub fn status_message(outcome: &Result<TransactionResult, ActionError>) -> String {
    match outcome {
        Ok(_) => SUBMITTED_MESSAGE.to_string(),
        Err(e) => e.to_string(),
    }
}
