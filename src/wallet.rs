use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Network;
use crate::model::ExecutionReceipt;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet rejected the request: {0}")]
    Rejected(String),
    #[error("wallet call failed: {0}")]
    Failed(String),
}

/// Serialized (base64 BCS) transaction block, opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionBlock(pub String);

/// Which parts of the execution result the node should return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseOptions {
    pub show_effects: bool,
    pub show_events: bool,
    pub show_object_changes: bool,
}

/// The wallet's generic sign-and-execute request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRequest {
    pub transaction_block: TransactionBlock,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    #[serde(default)]
    pub options: ResponseOptions,
}

/// A connected wallet's only capability the core uses.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    async fn sign_and_execute_transaction_block(
        &self,
        request: WalletRequest,
    ) -> Result<ExecutionReceipt, WalletError>;
}

/// What a lending SDK hands to its signer.
#[derive(Debug, Clone, PartialEq)]
pub struct SdkTransaction {
    pub transaction_block: TransactionBlock,
    pub options: ResponseOptions,
}

/// The narrower signer interface a lending SDK expects.
#[async_trait]
pub trait SdkSigner: Send + Sync {
    fn address(&self) -> &str;

    async fn sign_and_execute(&self, tx: SdkTransaction) -> Result<ExecutionReceipt, WalletError>;
}

/// Presents a wallet's generic signing entry point as an [`SdkSigner`].
///
/// Structural only: each SDK call becomes exactly one wallet call, the
/// wallet's receipt comes back untouched and wallet errors propagate as-is.
#[derive(Clone)]
pub struct WalletSigningAdapter {
    wallet: Arc<dyn WalletSigner>,
    address: String,
    chain: Option<String>,
}

impl WalletSigningAdapter {
    pub fn new(wallet: Arc<dyn WalletSigner>, address: impl Into<String>) -> Self {
        WalletSigningAdapter {
            wallet,
            address: address.into(),
            chain: None,
        }
    }

    /// Pin requests to a wallet-standard chain id (`sui:<network>`).
    pub fn on_network(mut self, network: Network) -> Self {
        self.chain = Some(format!("sui:{network}"));
        self
    }
}

#[async_trait]
impl SdkSigner for WalletSigningAdapter {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_and_execute(&self, tx: SdkTransaction) -> Result<ExecutionReceipt, WalletError> {
        let request = WalletRequest {
            transaction_block: tx.transaction_block,
            account: Some(self.address.clone()),
            chain: self.chain.clone(),
            options: tx.options,
        };
        self.wallet.sign_and_execute_transaction_block(request).await
    }
}
