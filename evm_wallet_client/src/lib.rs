//! # EVM Wallet Client
//!
//! A standalone library for driving one wallet against an EVM chain: connect
//! a signer over plain or proxied HTTP, read balances and network facts, bind
//! contract methods by name at runtime, and submit transactions with
//! estimate-plus-margin gas sizing and confirmation tracking.
//!
//! ## Features
//! - Per-instance provider construction, optionally through a caller-supplied
//!   `reqwest` client (proxy, timeout, header policy)
//! - Named contract bindings parsed from human-readable ABI entries
//! - Single-attempt submission: every RPC failure is returned as a value
//!
//! ## Usage
//!
//! ```no_run
//! use evm_wallet_client::*;
//! use alloy::signers::local::PrivateKeySigner;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), EvmError> {
//!     let rpc = RpcConfig {
//!         rpc_url: "https://testnet-rpc.monad.xyz".into(),
//!         chain_id: 10143,
//!     };
//!     let policy = TxPolicyConfig::default();
//!     let signer = PrivateKeySigner::random();
//!
//!     let mut client = EvmWalletClient::connect(rpc, signer, policy).await?;
//!
//!     let connection = client.connection_info().await?;
//!     println!("{} holds {} wei", connection.address, connection.balance_wei);
//!
//!     client.bind_contract(
//!         "0x703e753E9a2aCa1194DED65833EAec17dcFeAc1b".parse()?,
//!         &["function checkIn()"],
//!         "checkin",
//!     )?;
//!     let confirmation = client.execute("checkin", "checkIn", &[], ExecuteOpts::default()).await?;
//!     println!("confirmed in block {}", confirmation.block_number);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod contracts;
pub mod errors;
pub mod types;

pub use client::EvmWalletClient;
pub use config::{RpcConfig, TxPolicyConfig};
pub use contracts::BoundContract;
pub use errors::EvmError;
pub use types::*;
