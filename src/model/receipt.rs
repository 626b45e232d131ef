use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status marker the chain reports for an executed transaction.
pub const SUCCESS_STATUS: &str = "success";

/// Execution receipt in Sui JSON-RPC shape (`SuiTransactionBlockResponse`).
/// Only the fields the dispatcher inspects are typed; everything else is kept
/// verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<TransactionEffects>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionEffects {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ExecutionStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionReceipt {
    /// A receipt counts as successful only if `effects.status.status` reads
    /// exactly `"success"`.
    pub fn is_success(&self) -> bool {
        self.status().is_some_and(|s| s.status == SUCCESS_STATUS)
    }

    pub fn status(&self) -> Option<&ExecutionStatus> {
        self.effects.as_ref()?.status.as_ref()
    }

    /// Error text the chain attached to a failed execution, if any.
    pub fn failure_reason(&self) -> Option<&str> {
        self.status()?.error.as_deref()
    }
}
