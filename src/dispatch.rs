use std::sync::Arc;

use alloy::primitives::U256;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::model::{ActionArgs, ExecutionReceipt, LendingAction, LendingCall, TransactionResult};
use crate::units::{self, UnitsError};
use crate::wallet::{SdkSigner, WalletError};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid amount: {0}")]
    Amount(#[from] UnitsError),
    #[error("{action} failed in lending SDK: {message}")]
    Sdk {
        action: LendingAction,
        message: String,
    },
    #[error(transparent)]
    Wallet(#[from] WalletError),
}

/// The lending SDK's transaction entry points. Each builds the protocol
/// transaction, hands it to `signer`, and returns the execution receipt.
#[async_trait]
pub trait LendingSdk: Send + Sync {
    async fn deposit(
        &self,
        coin_type: &str,
        amount: U256,
        auto_create_obligation: bool,
        signer: &dyn SdkSigner,
    ) -> Result<ExecutionReceipt, DispatchError>;

    async fn withdraw(
        &self,
        coin_type: &str,
        amount: U256,
        auto_create_obligation: bool,
        signer: &dyn SdkSigner,
    ) -> Result<ExecutionReceipt, DispatchError>;

    async fn borrow(
        &self,
        coin_type: &str,
        amount: U256,
        auto_create_obligation: bool,
        signer: &dyn SdkSigner,
    ) -> Result<ExecutionReceipt, DispatchError>;

    async fn repay(
        &self,
        coin_type: &str,
        amount: U256,
        auto_create_obligation: bool,
        signer: &dyn SdkSigner,
    ) -> Result<ExecutionReceipt, DispatchError>;
}

/// Turns a user action into exactly one SDK call.
#[derive(Clone)]
pub struct Dispatcher {
    sdk: Arc<dyn LendingSdk>,
}

impl Dispatcher {
    pub fn new(sdk: Arc<dyn LendingSdk>) -> Self {
        Dispatcher { sdk }
    }

    /// Validate and convert a display amount into a typed call.
    pub fn prepare(
        action: LendingAction,
        coin_type: &str,
        amount: f64,
        decimals: u8,
    ) -> Result<LendingCall, DispatchError> {
        let amount = units::to_base_units(amount, decimals)?;
        Ok(action.with_args(ActionArgs {
            coin_type: coin_type.to_string(),
            amount,
            auto_create_obligation: true,
        }))
    }

    /// Submit one prepared call and return the raw receipt.
    pub async fn submit(
        &self,
        call: &LendingCall,
        signer: &dyn SdkSigner,
    ) -> Result<ExecutionReceipt, DispatchError> {
        let ActionArgs {
            coin_type,
            amount,
            auto_create_obligation,
        } = call.args();
        debug!(
            action = %call.action(),
            coin_type = %coin_type,
            amount = %amount,
            sender = signer.address(),
            "submitting lending transaction"
        );

        match call {
            LendingCall::Deposit(_) => {
                self.sdk
                    .deposit(coin_type, *amount, *auto_create_obligation, signer)
                    .await
            }
            LendingCall::Withdraw(_) => {
                self.sdk
                    .withdraw(coin_type, *amount, *auto_create_obligation, signer)
                    .await
            }
            LendingCall::Borrow(_) => {
                self.sdk
                    .borrow(coin_type, *amount, *auto_create_obligation, signer)
                    .await
            }
            LendingCall::Repay(_) => {
                self.sdk
                    .repay(coin_type, *amount, *auto_create_obligation, signer)
                    .await
            }
        }
    }

    /// Prepare and submit, keeping every failure as a typed error.
    pub async fn try_execute(
        &self,
        action: LendingAction,
        signer: &dyn SdkSigner,
        coin_type: &str,
        amount: f64,
        decimals: u8,
    ) -> Result<ExecutionReceipt, DispatchError> {
        let call = Self::prepare(action, coin_type, amount, decimals)?;
        self.submit(&call, signer).await
    }

    /// Run one action end to end. Never fails: every error is logged and
    /// reported as `{ success: false, digest: None }`.
    pub async fn execute(
        &self,
        action: LendingAction,
        signer: &dyn SdkSigner,
        coin_type: &str,
        amount: f64,
        decimals: u8,
    ) -> TransactionResult {
        match self.try_execute(action, signer, coin_type, amount, decimals).await {
            Ok(receipt) => interpret_receipt(action, &receipt),
            Err(e) => {
                error!(action = %action, coin_type, error = %e, "lending transaction failed");
                TransactionResult::failed()
            }
        }
    }
}

/// Success only when the receipt's status reads exactly `"success"`.
pub fn interpret_receipt(action: LendingAction, receipt: &ExecutionReceipt) -> TransactionResult {
    let success = receipt.is_success();
    if success {
        info!(action = %action, digest = ?receipt.digest, "lending transaction succeeded");
    } else {
        warn!(
            action = %action,
            digest = ?receipt.digest,
            status = ?receipt.status().map(|s| s.status.as_str()),
            reason = ?receipt.failure_reason(),
            "lending transaction did not succeed"
        );
    }
    TransactionResult {
        success,
        digest: receipt.digest.clone(),
    }
}
