use std::time::Instant;

use checkin_pipeline_connectors::backend::portal_backend::{CheckinRecord, PortalBackend};
use checkin_pipeline_connectors::backend::wallet_backend::WalletBackend;
use checkin_pipeline_core::signin::SigninProfile;
use chrono::Utc;
use evm_wallet_client::U256;
use log::{info, warn};

use crate::outcome::{CheckinOutcome, CheckinStatus};

/// Per-batch constants the workflow needs beyond its two backends.
#[derive(Clone, Debug)]
pub struct WorkflowSettings {
    /// Chain id reported to the portal with each check-in record.
    pub chain_id: u64,
    pub signin: SigninProfile,
    pub wallet_app: String,
}

/// One wallet's check-in, from cold credential to recorded transaction.
///
/// The run is a one-way trip: connect, authenticate against the portal,
/// submit the on-chain check-in, then report back. Each step either advances
/// the wallet or terminates the run with the failure class of that step.
/// Portal bookkeeping after a confirmed transaction only ever downgrades to
/// a warning; the chain is the source of truth by then.
pub struct CheckinWorkflow<W, P> {
    index: usize,
    wallet_id: String,
    wallet: W,
    portal: P,
    settings: WorkflowSettings,
}

impl<W, P> CheckinWorkflow<W, P>
where
    W: WalletBackend,
    P: PortalBackend,
{
    pub fn new(index: usize, wallet_id: String, wallet: W, portal: P, settings: WorkflowSettings) -> Self {
        CheckinWorkflow {
            index,
            wallet_id,
            wallet,
            portal,
            settings,
        }
    }

    pub async fn run(self) -> CheckinOutcome {
        let started = Instant::now();
        info!("[{}] starting check-in", self.wallet_id);

        // Created -> Initialized
        let connection = match self.wallet.connect().await {
            Ok(connection) => connection,
            Err(e) => {
                return self.failure(started, CheckinStatus::ConnectFailed, e.to_string(), None, None);
            }
        };
        let address = connection.address.to_string();
        info!("[{}] connected as {}", self.wallet_id, address);

        // Initialized -> Authenticated. The network read is part of the auth
        // step: its chain id goes into the signed message.
        let network = match self.wallet.network_info().await {
            Ok(network) => network,
            Err(e) => {
                return self.failure(
                    started,
                    CheckinStatus::AuthFailed,
                    e.to_string(),
                    Some(address),
                    Some(connection.balance_wei),
                );
            }
        };

        let nonce = match self.portal.fetch_nonce(&address).await {
            Ok(nonce) => nonce,
            Err(e) => {
                return self.failure(
                    started,
                    CheckinStatus::AuthFailed,
                    format!("nonce retrieval failed: {e}"),
                    Some(address),
                    Some(connection.balance_wei),
                );
            }
        };

        let message = self
            .settings
            .signin
            .build_message(&address, network.chain_id, &nonce, Utc::now());
        let signature = match self.wallet.sign_message(&message).await {
            Ok(signature) => signature,
            Err(e) => {
                return self.failure(
                    started,
                    CheckinStatus::AuthFailed,
                    e.to_string(),
                    Some(address),
                    Some(connection.balance_wei),
                );
            }
        };

        let token = match self.portal.login(&address, &signature, &message).await {
            Ok(token) => token,
            Err(e) => {
                return self.failure(
                    started,
                    CheckinStatus::AuthFailed,
                    format!("login failed: {e}"),
                    Some(address),
                    Some(connection.balance_wei),
                );
            }
        };
        info!("[{}] authenticated with portal", self.wallet_id);

        // Authenticated -> Transacted
        let confirmation = match self.wallet.execute_checkin().await {
            Ok(confirmation) => confirmation,
            Err(e) => {
                return self.failure(
                    started,
                    CheckinStatus::ChainFailed,
                    e.to_string(),
                    Some(address),
                    Some(connection.balance_wei),
                );
            }
        };
        info!(
            "[{}] check-in confirmed: {} (block {})",
            self.wallet_id, confirmation.tx_hash, confirmation.block_number
        );

        // Transacted -> Recorded -> Finalized. Past this point the check-in
        // already happened on chain; portal failures become warnings.
        let mut warnings = Vec::new();
        let record = CheckinRecord {
            wallet_address: address.clone(),
            transaction_hash: confirmation.tx_hash.clone(),
            chain_id: self.settings.chain_id,
            wallet_app: self.settings.wallet_app.clone(),
        };
        match self.portal.record_checkin(&token, &record).await {
            Ok(()) => {
                // Points only move once the portal has seen the record.
                if let Err(e) = self.portal.update_points(&token).await {
                    warn!("[{}] points update failed: {}", self.wallet_id, e);
                    warnings.push(format!("points update failed: {e}"));
                }
            }
            Err(e) => {
                warn!("[{}] check-in record failed: {}", self.wallet_id, e);
                warnings.push(format!("check-in record failed: {e}"));
            }
        }

        CheckinOutcome {
            index: self.index,
            wallet_id: self.wallet_id,
            address: Some(address),
            balance_wei: Some(connection.balance_wei),
            tx_hash: Some(confirmation.tx_hash),
            block_number: Some(confirmation.block_number),
            gas_used: Some(confirmation.gas_used),
            duration_secs: started.elapsed().as_secs_f64(),
            status: CheckinStatus::Success,
            error: None,
            warnings,
        }
    }

    fn failure(
        &self,
        started: Instant,
        status: CheckinStatus,
        error: String,
        address: Option<String>,
        balance_wei: Option<U256>,
    ) -> CheckinOutcome {
        warn!("[{}] {}: {}", self.wallet_id, status.description(), error);
        CheckinOutcome {
            index: self.index,
            wallet_id: self.wallet_id.clone(),
            address,
            balance_wei,
            tx_hash: None,
            block_number: None,
            gas_used: None,
            duration_secs: started.elapsed().as_secs_f64(),
            status,
            error: Some(error),
            warnings: Vec::new(),
        }
    }
}
