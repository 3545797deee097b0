// Core EVM wallet client bound to one signer and one RPC endpoint

use crate::{config::*, contracts::BoundContract, errors::EvmError, types::*};
use alloy::{
    network::EthereumWallet,
    providers::{DynProvider, ProviderBuilder},
    rpc::client::RpcClient,
    signers::Signer,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct EvmWalletClient {
    pub provider: DynProvider,
    pub from: Address,
    pub chain_id: u64,
    pub policy: TxPolicyConfig,
    pub(crate) contracts: HashMap<String, BoundContract>,
    signer: PrivateKeySigner,
}

impl EvmWalletClient {
    /// Connects over plain HTTP.
    pub async fn connect(
        rpc: RpcConfig,
        signer: PrivateKeySigner,
        policy: TxPolicyConfig,
    ) -> Result<Self, EvmError> {
        let wallet = EthereumWallet::from(signer.clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(parse_rpc_url(&rpc.rpc_url)?);

        Ok(Self::from_parts(provider.erased(), signer, rpc.chain_id, policy))
    }

    /// Connects through a caller-supplied HTTP client, which carries the proxy,
    /// timeout, and header policy. Egress isolation between wallets relies on
    /// every wallet passing its own client here.
    pub async fn connect_with_http_client(
        rpc: RpcConfig,
        signer: PrivateKeySigner,
        policy: TxPolicyConfig,
        http_client: reqwest::Client,
    ) -> Result<Self, EvmError> {
        let wallet = EthereumWallet::from(signer.clone());
        let transport = Http::with_client(http_client, parse_rpc_url(&rpc.rpc_url)?);
        let rpc_client = RpcClient::new(transport, false);
        let provider = ProviderBuilder::new().wallet(wallet).connect_client(rpc_client);

        Ok(Self::from_parts(provider.erased(), signer, rpc.chain_id, policy))
    }

    fn from_parts(
        provider: DynProvider,
        signer: PrivateKeySigner,
        chain_id: u64,
        policy: TxPolicyConfig,
    ) -> Self {
        Self {
            provider,
            from: signer.address(),
            chain_id,
            policy,
            contracts: HashMap::new(),
            signer,
        }
    }

    pub fn address(&self) -> Address {
        self.from
    }

    /// Resolves the signer address and its current native balance.
    pub async fn connection_info(&self) -> Result<WalletConnection, EvmError> {
        let balance_wei = self.provider.get_balance(self.from).await?;
        Ok(WalletConnection {
            address: self.from,
            balance_wei,
        })
    }

    /// Reads chain id, head block, and fee data.
    pub async fn network_info(&self) -> Result<NetworkInfo, EvmError> {
        let chain_id = self.provider.get_chain_id().await?;
        let block_number = self.provider.get_block_number().await?;
        let gas_price_wei = self.provider.get_gas_price().await?;
        let max_priority_fee_wei = self.provider.get_max_priority_fee_per_gas().await.ok();

        Ok(NetworkInfo {
            chain_id,
            block_number,
            gas_price_wei,
            max_priority_fee_wei,
        })
    }

    /// EIP-191 personal-sign over the given text; returns the 65-byte
    /// signature as 0x-prefixed hex.
    pub async fn sign_message(&self, message: &str) -> Result<String, EvmError> {
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| EvmError::Signing(e.to_string()))?;

        Ok(alloy::hex::encode_prefixed(signature.as_bytes()))
    }
}

fn parse_rpc_url(raw: &str) -> Result<reqwest::Url, EvmError> {
    raw.parse().map_err(|e| EvmError::Other(format!("{}", e)))
}
