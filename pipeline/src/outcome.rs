use checkin_pipeline_core::units::format_native;
use evm_wallet_client::U256;

/// Terminal state of a single wallet's check-in run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckinStatus {
    Success,
    /// The wallet context could not be assembled (bad proxy entry).
    ConfigFailed,
    /// Credential or RPC binding failed before any portal traffic.
    ConnectFailed,
    /// Portal authentication failed (nonce, signature, or login).
    AuthFailed,
    /// The check-in transaction failed or never confirmed.
    ChainFailed,
}

impl CheckinStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, CheckinStatus::Success)
    }

    pub fn description(&self) -> &'static str {
        match self {
            CheckinStatus::Success => "success",
            CheckinStatus::ConfigFailed => "config failed",
            CheckinStatus::ConnectFailed => "connect failed",
            CheckinStatus::AuthFailed => "auth failed",
            CheckinStatus::ChainFailed => "chain failed",
        }
    }
}

/// Everything the batch learned about one wallet, success or not. Appended to
/// the results in input order; one entry per credential, always.
#[derive(Clone, Debug)]
pub struct CheckinOutcome {
    /// 1-based position in the credential file.
    pub index: usize,
    pub wallet_id: String,
    pub address: Option<String>,
    pub balance_wei: Option<U256>,
    pub tx_hash: Option<String>,
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
    pub duration_secs: f64,
    pub status: CheckinStatus,
    pub error: Option<String>,
    /// Non-fatal follow-up failures (portal bookkeeping after a confirmed tx).
    pub warnings: Vec<String>,
}

impl CheckinOutcome {
    /// An outcome for a wallet that never ran because its context was invalid.
    pub fn config_failure(index: usize, wallet_id: String, error: String) -> Self {
        CheckinOutcome {
            index,
            wallet_id,
            address: None,
            balance_wei: None,
            tx_hash: None,
            block_number: None,
            gas_used: None,
            duration_secs: 0.0,
            status: CheckinStatus::ConfigFailed,
            error: Some(error),
            warnings: Vec::new(),
        }
    }

    pub fn formatted_address(&self) -> String {
        self.address.clone().unwrap_or_else(|| "-".to_string())
    }

    pub fn formatted_balance(&self) -> String {
        match self.balance_wei {
            Some(wei) => format_native(wei),
            None => "-".to_string(),
        }
    }

    pub fn formatted_tx(&self) -> String {
        self.tx_hash.clone().unwrap_or_else(|| "-".to_string())
    }

    pub fn formatted_duration(&self) -> String {
        format!("{:.2}", self.duration_secs)
    }

    pub fn formatted_warnings(&self) -> String {
        if self.warnings.is_empty() {
            "-".to_string()
        } else {
            self.warnings.join("; ")
        }
    }
}

/// Aggregate view over a finished batch.
#[derive(Clone, Debug)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub success_rate_pct: f64,
    pub total_duration_secs: f64,
    pub mean_duration_secs: f64,
    /// (index, reason) for every non-success, in batch order.
    pub failures: Vec<(usize, String)>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[CheckinOutcome]) -> Self {
        let total = outcomes.len();
        let succeeded = outcomes.iter().filter(|o| o.status.is_success()).count();
        let failed = total - succeeded;
        let success_rate_pct = if total == 0 {
            0.0
        } else {
            succeeded as f64 * 100.0 / total as f64
        };
        let total_duration_secs: f64 = outcomes.iter().map(|o| o.duration_secs).sum();
        let mean_duration_secs = if total == 0 {
            0.0
        } else {
            total_duration_secs / total as f64
        };
        let failures = outcomes
            .iter()
            .filter(|o| !o.status.is_success())
            .map(|o| {
                let reason = o
                    .error
                    .clone()
                    .unwrap_or_else(|| o.status.description().to_string());
                (o.index, reason)
            })
            .collect();

        BatchSummary {
            total,
            succeeded,
            failed,
            success_rate_pct,
            total_duration_secs,
            mean_duration_secs,
            failures,
        }
    }

    pub fn formatted_success_rate(&self) -> String {
        format!("{:.1}%", self.success_rate_pct)
    }
}
