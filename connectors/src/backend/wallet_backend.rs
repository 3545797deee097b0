use async_trait::async_trait;
use evm_wallet_client::{
    Address, EvmWalletClient, ExecuteOpts, NetworkInfo, TxConfirmation, WalletConnection,
};

use crate::error::{ConnectorError, ConnectorResult};

const CHECKIN_BINDING: &str = "checkin";
const CHECKIN_METHOD: &str = "checkIn";

/// Chain-side collaborator for one wallet context.
///
/// Implementations own their RPC connection outright; nothing is pooled or
/// shared between wallets.
#[mockall::automock]
#[async_trait]
pub trait WalletBackend: Send + Sync {
    // binding
    async fn connect(&self) -> ConnectorResult<WalletConnection>;

    async fn network_info(&self) -> ConnectorResult<NetworkInfo>;

    // signing
    async fn sign_message(&self, message: &str) -> ConnectorResult<String>;

    // the one write this workflow performs
    async fn execute_checkin(&self) -> ConnectorResult<TxConfirmation>;
}

/// Adapter over [`EvmWalletClient`]. The check-in contract is bound once at
/// construction, so the client needs no further mutation.
pub struct WalletBackendImpl {
    client: EvmWalletClient,
}

impl WalletBackendImpl {
    pub fn new(
        mut client: EvmWalletClient,
        contract_address: Address,
        contract_abi: &[&str],
    ) -> ConnectorResult<Self> {
        client
            .bind_contract(contract_address, contract_abi, CHECKIN_BINDING)
            .map_err(|e| ConnectorError::backend(format!("check-in contract binding failed: {e}")))?;

        Ok(Self { client })
    }

    pub fn address(&self) -> Address {
        self.client.address()
    }
}

#[async_trait]
impl WalletBackend for WalletBackendImpl {
    async fn connect(&self) -> ConnectorResult<WalletConnection> {
        self.client
            .connection_info()
            .await
            .map_err(|e| ConnectorError::backend(format!("wallet connect failed: {e}")))
    }

    async fn network_info(&self) -> ConnectorResult<NetworkInfo> {
        self.client
            .network_info()
            .await
            .map_err(|e| ConnectorError::backend(format!("network info failed: {e}")))
    }

    async fn sign_message(&self, message: &str) -> ConnectorResult<String> {
        self.client
            .sign_message(message)
            .await
            .map_err(|e| ConnectorError::backend(format!("message signing failed: {e}")))
    }

    async fn execute_checkin(&self) -> ConnectorResult<TxConfirmation> {
        self.client
            .execute(CHECKIN_BINDING, CHECKIN_METHOD, &[], ExecuteOpts::default())
            .await
            .map_err(|e| ConnectorError::backend(format!("check-in execution failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evm_wallet_client::{PrivateKeySigner, RpcConfig, TxPolicyConfig};

    async fn offline_client() -> EvmWalletClient {
        EvmWalletClient::connect(
            RpcConfig {
                rpc_url: "http://localhost:8545".into(),
                chain_id: 10_143,
            },
            PrivateKeySigner::random(),
            TxPolicyConfig::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn construction_binds_the_checkin_contract() {
        let client = offline_client().await;
        let backend = WalletBackendImpl::new(
            client,
            "0x703e753E9a2aCa1194DED65833EAec17dcFeAc1b".parse().unwrap(),
            &["function checkIn()"],
        )
        .unwrap();

        assert!(backend.client.bound_contract(CHECKIN_BINDING).is_some());
    }

    #[tokio::test]
    async fn construction_fails_on_malformed_abi() {
        let client = offline_client().await;
        let result = WalletBackendImpl::new(
            client,
            "0x703e753E9a2aCa1194DED65833EAec17dcFeAc1b".parse().unwrap(),
            &["nope"],
        );

        assert!(matches!(result, Err(ConnectorError::Backend { .. })));
    }
}
