// Runtime contract bindings and transaction submission

use crate::{client::EvmWalletClient, errors::EvmError, types::*};
use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt},
    json_abi::Function,
    network::TransactionBuilder,
    primitives::Bytes,
    rpc::types::TransactionRequest,
};
use std::collections::HashMap;
use std::time::Duration;

/// One named contract handle: an address plus the functions parsed from
/// human-readable ABI entries.
#[derive(Debug, Clone)]
pub struct BoundContract {
    pub address: Address,
    functions: HashMap<String, Function>,
}

impl BoundContract {
    fn parse(address: Address, abi: &[&str]) -> Result<Self, EvmError> {
        let mut functions = HashMap::new();
        for entry in abi {
            let function = Function::parse(entry).map_err(|e| EvmError::Abi(e.to_string()))?;
            functions.insert(function.name.clone(), function);
        }

        Ok(Self { address, functions })
    }

    fn function(&self, method: &str) -> Option<&Function> {
        self.functions.get(method)
    }
}

impl EvmWalletClient {
    /// Binds `abi` at `address` under `name`. Idempotent per name: binding
    /// the same name again replaces the previous handle.
    pub fn bind_contract(&mut self, address: Address, abi: &[&str], name: &str) -> Result<(), EvmError> {
        let bound = BoundContract::parse(address, abi)?;
        self.contracts.insert(name.to_string(), bound);
        Ok(())
    }

    pub fn bound_contract(&self, name: &str) -> Option<&BoundContract> {
        self.contracts.get(name)
    }

    /// Read-only call; returns the decoded outputs.
    pub async fn call(
        &self,
        name: &str,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, EvmError> {
        let (function, tx) = self.build_contract_tx(name, method, args)?;
        let output = self.provider.call(tx).await?;

        function
            .abi_decode_output(&output)
            .map_err(|e| EvmError::Abi(e.to_string()))
    }

    /// State-changing submission: sizes gas from an estimate plus the policy
    /// margin unless an explicit limit is given, then waits for
    /// `policy.confirm_blocks` confirmations.
    pub async fn execute(
        &self,
        name: &str,
        method: &str,
        args: &[DynSolValue],
        opts: ExecuteOpts,
    ) -> Result<TxConfirmation, EvmError> {
        let (_, tx) = self.build_contract_tx(name, method, args)?;
        self.submit(tx, opts).await
    }

    /// Plain native transfer through the same sizing and confirmation path.
    pub async fn send_native(
        &self,
        to: Address,
        amount_wei: U256,
        opts: ExecuteOpts,
    ) -> Result<TxConfirmation, EvmError> {
        let tx = TransactionRequest::default().to(to).value(amount_wei);
        self.submit(tx, opts).await
    }

    fn build_contract_tx(
        &self,
        name: &str,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<(&Function, TransactionRequest), EvmError> {
        let contract = self
            .bound_contract(name)
            .ok_or_else(|| EvmError::UnknownContract(name.to_string()))?;
        let function = contract.function(method).ok_or_else(|| EvmError::UnknownMethod {
            contract: name.to_string(),
            method: method.to_string(),
        })?;

        let data = function
            .abi_encode_input(args)
            .map_err(|e| EvmError::Abi(e.to_string()))?;

        let tx = TransactionRequest::default()
            .to(contract.address)
            .input(Bytes::from(data).into());

        Ok((function, tx))
    }

    async fn submit(&self, tx: TransactionRequest, opts: ExecuteOpts) -> Result<TxConfirmation, EvmError> {
        let mut tx = tx.from(self.from);
        tx.set_chain_id(self.chain_id);

        if let Some(value) = opts.value {
            tx.set_value(value);
        }

        if let Some(gas_price) = opts.gas_price_wei.or(self.policy.gas_price_wei) {
            tx.set_gas_price(gas_price);
        }

        let gas_limit = match opts.gas_limit {
            Some(limit) => limit,
            None => {
                let estimated = self.provider.estimate_gas(tx.clone()).await?;
                self.policy.gas_limit_with_margin(estimated)
            }
        };
        tx.set_gas_limit(gas_limit);

        let pending = self.provider.send_transaction(tx).await?;
        let receipt = pending
            .with_required_confirmations(self.policy.confirm_blocks)
            .with_timeout(Some(Duration::from_secs(self.policy.receipt_timeout_secs)))
            .get_receipt()
            .await
            .map_err(|e| EvmError::Other(e.to_string()))?;

        if !receipt.status() {
            return Err(EvmError::Reverted(receipt.transaction_hash.to_string()));
        }

        Ok(TxConfirmation {
            tx_hash: receipt.transaction_hash.to_string(),
            block_number: receipt.block_number.unwrap_or_default(),
            gas_used: receipt.gas_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RpcConfig, TxPolicyConfig};

    async fn offline_client() -> EvmWalletClient {
        EvmWalletClient::connect(
            RpcConfig {
                rpc_url: "http://localhost:8545".into(),
                chain_id: 1,
            },
            PrivateKeySigner::random(),
            TxPolicyConfig::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn bind_contract_replaces_existing_name() {
        let mut client = offline_client().await;
        let first: Address = "0x0000000000000000000000000000000000000001".parse().unwrap();
        let second: Address = "0x0000000000000000000000000000000000000002".parse().unwrap();

        client.bind_contract(first, &["function checkIn()"], "checkin").unwrap();
        client.bind_contract(second, &["function checkIn()"], "checkin").unwrap();

        assert_eq!(client.bound_contract("checkin").unwrap().address, second);
    }

    #[tokio::test]
    async fn bind_contract_rejects_malformed_abi() {
        let mut client = offline_client().await;
        let err = client
            .bind_contract(Address::ZERO, &["definitely not solidity"], "bad")
            .unwrap_err();

        assert!(matches!(err, EvmError::Abi(_)));
    }

    #[tokio::test]
    async fn execute_on_unknown_binding_fails_before_any_rpc() {
        let client = offline_client().await;
        let err = client
            .execute("missing", "checkIn", &[], ExecuteOpts::default())
            .await
            .unwrap_err();

        assert!(matches!(err, EvmError::UnknownContract(name) if name == "missing"));
    }

    #[tokio::test]
    async fn unknown_method_names_both_contract_and_method() {
        let mut client = offline_client().await;
        client
            .bind_contract(Address::ZERO, &["function checkIn()"], "checkin")
            .unwrap();

        let err = client
            .execute("checkin", "checkOut", &[], ExecuteOpts::default())
            .await
            .unwrap_err();

        match err {
            EvmError::UnknownMethod { contract, method } => {
                assert_eq!(contract, "checkin");
                assert_eq!(method, "checkOut");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn bound_functions_are_keyed_by_name() {
        let mut client = offline_client().await;
        client
            .bind_contract(
                Address::ZERO,
                &["function checkIn()", "function balanceOf(address) returns (uint256)"],
                "multi",
            )
            .unwrap();

        let contract = client.bound_contract("multi").unwrap();
        assert!(contract.function("checkIn").is_some());
        assert!(contract.function("balanceOf").is_some());
        assert!(contract.function("transfer").is_none());
    }
}
