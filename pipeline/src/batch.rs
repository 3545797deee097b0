use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use checkin_pipeline_connectors::backend::portal_backend::PortalBackendImpl;
use checkin_pipeline_connectors::backend::wallet_backend::WalletBackendImpl;
use checkin_pipeline_connectors::proxy::ProxyBinding;
use checkin_pipeline_connectors::web_client::{WebClient, WebClientConfig};
use checkin_pipeline_core::credential::{Credential, wallet_id};
use evm_wallet_client::{EvmWalletClient, PrivateKeySigner, RpcConfig};
use tracing::{info, warn};

use crate::config::{CHECKIN_CONTRACT_ABI, Config};
use crate::error::PipelineResult;
use crate::outcome::{CheckinOutcome, CheckinStatus};
use crate::stage::PipelineStage;
use crate::workflow::{CheckinWorkflow, WorkflowSettings};

/// Egress path decided for one wallet before the batch starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProxyAssignment {
    Direct,
    Bound(ProxyBinding),
    /// The assigned proxy line could not be parsed. The wallet still gets a
    /// result row, but nothing runs for it.
    Invalid { reason: String },
}

impl ProxyAssignment {
    pub fn describe(&self) -> &str {
        match self {
            ProxyAssignment::Direct => "direct",
            ProxyAssignment::Bound(binding) => binding.redacted(),
            ProxyAssignment::Invalid { .. } => "invalid",
        }
    }
}

/// One wallet's full context: position, credential, and egress path.
#[derive(Clone, Debug)]
pub struct WalletSeed {
    /// 1-based position in the credential file.
    pub index: usize,
    pub wallet_id: String,
    pub credential: Credential,
    pub proxy: ProxyAssignment,
}

/// Pairs every credential with a proxy by position, wrapping over the proxy
/// list when wallets outnumber proxies. An empty proxy list means every
/// wallet connects directly.
pub fn seed_wallets(credentials: &[Credential], proxy_lines: &[String]) -> Vec<WalletSeed> {
    credentials
        .iter()
        .enumerate()
        .map(|(pos, credential)| {
            let index = pos + 1;
            let proxy = if proxy_lines.is_empty() {
                ProxyAssignment::Direct
            } else {
                match ProxyBinding::parse(&proxy_lines[pos % proxy_lines.len()]) {
                    Ok(binding) => ProxyAssignment::Bound(binding),
                    Err(e) => ProxyAssignment::Invalid {
                        reason: e.to_string(),
                    },
                }
            };

            WalletSeed {
                index,
                wallet_id: wallet_id(index),
                credential: credential.clone(),
                proxy,
            }
        })
        .collect()
}

/// Runs one seeded wallet to completion. Split out so the batch loop can be
/// exercised without touching a chain or the portal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletRunner: Send + Sync {
    async fn run_wallet(&self, seed: &WalletSeed) -> CheckinOutcome;
}

/// Binds a seed's credential to the RPC endpoint, through its proxy when one
/// is assigned. Shared by the batch runner and the standalone commands.
pub async fn connect_seed_client(config: &Config, seed: &WalletSeed) -> PipelineResult<EvmWalletClient> {
    let signer = seed
        .credential
        .reveal()
        .parse::<PrivateKeySigner>()
        .map_err(|e| format!("invalid private key for {}: {e}", seed.wallet_id))?;

    let rpc = RpcConfig {
        rpc_url: config.chain.rpc_url.clone(),
        chain_id: config.chain.chain_id,
    };
    let policy = config.tx_policy();

    let client = match &seed.proxy {
        ProxyAssignment::Invalid { reason } => {
            return Err(format!("unsupported proxy for {}: {reason}", seed.wallet_id).into());
        }
        ProxyAssignment::Bound(binding) => {
            let http = reqwest::Client::builder()
                .proxy(binding.to_reqwest()?)
                .timeout(Duration::from_millis(config.http_timeout_ms))
                .build()
                .map_err(|e| format!("proxied http client build failed: {e}"))?;
            EvmWalletClient::connect_with_http_client(rpc, signer, policy, http).await
        }
        ProxyAssignment::Direct => EvmWalletClient::connect(rpc, signer, policy).await,
    }
    .map_err(|e| format!("rpc connection failed: {e}"))?;

    Ok(client)
}

/// Production runner: builds the wallet and portal backends for a seed and
/// hands them to the check-in workflow.
pub struct LiveWalletRunner {
    config: Arc<Config>,
}

impl LiveWalletRunner {
    pub fn new(config: Arc<Config>) -> Self {
        LiveWalletRunner { config }
    }

    async fn build_workflow(
        &self,
        seed: &WalletSeed,
    ) -> PipelineResult<CheckinWorkflow<WalletBackendImpl, PortalBackendImpl>> {
        let client = connect_seed_client(&self.config, seed).await?;
        let wallet = WalletBackendImpl::new(client, self.config.contract_address, CHECKIN_CONTRACT_ABI)?;

        let proxy = match &seed.proxy {
            ProxyAssignment::Bound(binding) => Some(binding.clone()),
            _ => None,
        };
        let web = WebClient::new(WebClientConfig {
            timeout: Duration::from_millis(self.config.http_timeout_ms),
            user_agent: self.config.user_agent_policy(),
            proxy,
        })
        .map_err(|e| format!("web client build failed: {e}"))?;
        let portal = PortalBackendImpl::new(web, self.config.portal_base_url.clone());

        let settings = WorkflowSettings {
            chain_id: self.config.chain.chain_id,
            signin: self.config.signin.clone(),
            wallet_app: self.config.wallet_app.clone(),
        };

        Ok(CheckinWorkflow::new(
            seed.index,
            seed.wallet_id.clone(),
            wallet,
            portal,
            settings,
        ))
    }
}

#[async_trait]
impl WalletRunner for LiveWalletRunner {
    async fn run_wallet(&self, seed: &WalletSeed) -> CheckinOutcome {
        let started = Instant::now();
        match self.build_workflow(seed).await {
            Ok(workflow) => workflow.run().await,
            Err(e) => {
                warn!(wallet = %seed.wallet_id, error = %e, "wallet context build failed");
                CheckinOutcome {
                    index: seed.index,
                    wallet_id: seed.wallet_id.clone(),
                    address: None,
                    balance_wei: None,
                    tx_hash: None,
                    block_number: None,
                    gas_used: None,
                    duration_secs: started.elapsed().as_secs_f64(),
                    status: CheckinStatus::ConnectFailed,
                    error: Some(e.to_string()),
                    warnings: Vec::new(),
                }
            }
        }
    }
}

/// Drives seeds through a [`WalletRunner`] one at a time, in input order,
/// pausing between wallets. Every seed yields exactly one outcome; a wallet
/// failing never stops the batch.
pub struct BatchRunner<R> {
    runner: R,
    pacing_delay: Duration,
}

impl<R> BatchRunner<R> {
    pub fn new(runner: R, pacing_delay: Duration) -> Self {
        BatchRunner { runner, pacing_delay }
    }
}

#[async_trait]
impl<'a, R> PipelineStage<'a, Vec<WalletSeed>, Vec<CheckinOutcome>> for BatchRunner<R>
where
    R: WalletRunner,
{
    async fn process(&self, input: &'a Vec<WalletSeed>) -> PipelineResult<Vec<CheckinOutcome>> {
        let mut outcomes = Vec::with_capacity(input.len());

        for (pos, seed) in input.iter().enumerate() {
            if pos > 0 && !self.pacing_delay.is_zero() {
                tokio::time::sleep(self.pacing_delay).await;
            }

            let outcome = match &seed.proxy {
                ProxyAssignment::Invalid { reason } => {
                    warn!(wallet = %seed.wallet_id, "skipping wallet with unusable proxy entry");
                    CheckinOutcome::config_failure(
                        seed.index,
                        seed.wallet_id.clone(),
                        format!("unsupported proxy: {reason}"),
                    )
                }
                _ => {
                    info!(wallet = %seed.wallet_id, proxy = seed.proxy.describe(), "running check-in");
                    self.runner.run_wallet(seed).await
                }
            };
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}
