use std::fmt;
use std::str::FromStr;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Lending protocol actions a user can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LendingAction {
    /// Supply assets as lendable liquidity.
    Deposit,
    /// Withdraw previously supplied assets.
    Withdraw,
    /// Borrow against supplied collateral.
    Borrow,
    /// Repay an outstanding borrow.
    Repay,
}

impl LendingAction {
    pub const ALL: [LendingAction; 4] = [
        LendingAction::Deposit,
        LendingAction::Withdraw,
        LendingAction::Borrow,
        LendingAction::Repay,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LendingAction::Deposit => "Deposit",
            LendingAction::Withdraw => "Withdraw",
            LendingAction::Borrow => "Borrow",
            LendingAction::Repay => "Repay",
        }
    }

    /// Pair the action with its arguments.
    pub fn with_args(self, args: ActionArgs) -> LendingCall {
        match self {
            LendingAction::Deposit => LendingCall::Deposit(args),
            LendingAction::Withdraw => LendingCall::Withdraw(args),
            LendingAction::Borrow => LendingCall::Borrow(args),
            LendingAction::Repay => LendingCall::Repay(args),
        }
    }
}

impl fmt::Display for LendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LendingAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deposit" | "supply" => Ok(LendingAction::Deposit),
            "withdraw" => Ok(LendingAction::Withdraw),
            "borrow" => Ok(LendingAction::Borrow),
            "repay" => Ok(LendingAction::Repay),
            other => Err(format!("unknown lending action '{other}'")),
        }
    }
}

/// Arguments every lending call carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionArgs {
    pub coin_type: String,
    /// Amount in base units.
    pub amount: U256,
    /// Let the SDK create the user's obligation/position object when missing.
    pub auto_create_obligation: bool,
}

/// A fully typed SDK call, one variant per action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LendingCall {
    Deposit(ActionArgs),
    Withdraw(ActionArgs),
    Borrow(ActionArgs),
    Repay(ActionArgs),
}

impl LendingCall {
    pub fn action(&self) -> LendingAction {
        match self {
            LendingCall::Deposit(_) => LendingAction::Deposit,
            LendingCall::Withdraw(_) => LendingAction::Withdraw,
            LendingCall::Borrow(_) => LendingAction::Borrow,
            LendingCall::Repay(_) => LendingAction::Repay,
        }
    }

    pub fn args(&self) -> &ActionArgs {
        match self {
            LendingCall::Deposit(args)
            | LendingCall::Withdraw(args)
            | LendingCall::Borrow(args)
            | LendingCall::Repay(args) => args,
        }
    }
}

/// Outcome of one dispatched action. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub success: bool,
    pub digest: Option<String>,
}

impl TransactionResult {
    pub fn failed() -> Self {
        TransactionResult::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse() {
        assert_eq!("deposit".parse::<LendingAction>(), Ok(LendingAction::Deposit));
        assert_eq!("Supply".parse::<LendingAction>(), Ok(LendingAction::Deposit));
        assert_eq!("REPAY".parse::<LendingAction>(), Ok(LendingAction::Repay));
        assert!("liquidate".parse::<LendingAction>().is_err());
    }

    #[test]
    fn test_call_keeps_action() {
        for action in LendingAction::ALL {
            let call = action.with_args(ActionArgs {
                coin_type: "0x2::sui::SUI".to_string(),
                amount: U256::from(1u64),
                auto_create_obligation: true,
            });
            assert_eq!(call.action(), action);
            assert_eq!(call.args().amount, U256::from(1u64));
        }
    }
}
