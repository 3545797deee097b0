// Common types and re-exports

pub use alloy::{
    network::Ethereum,
    primitives::{Address, B256, U256},
    providers::Provider as _,
    rpc::types::TransactionReceipt,
    signers::local::PrivateKeySigner,
    transports::http::{Client, Http},
};

/// Address and native balance resolved for a connected signer.
#[derive(Debug, Clone)]
pub struct WalletConnection {
    pub address: Address,
    pub balance_wei: U256,
}

/// Chain facts read in one pass.
#[derive(Debug, Clone)]
pub struct NetworkInfo {
    pub chain_id: u64,
    pub block_number: u64,
    pub gas_price_wei: u128,
    pub max_priority_fee_wei: Option<u128>,
}

/// Receipt summary for a confirmed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxConfirmation {
    pub tx_hash: String,
    pub block_number: u64,
    pub gas_used: u64,
}

/// Per-call overrides for state-changing submissions.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOpts {
    /// Explicit legacy gas price in wei; `None` falls back to the policy,
    /// then to network pricing.
    pub gas_price_wei: Option<u128>,
    /// Explicit gas limit; skips estimation and the safety margin entirely.
    pub gas_limit: Option<u64>,
    /// Native value to attach to the call.
    pub value: Option<U256>,
}
