use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use checkin_pipeline_commons::error::{CodedError, ErrorCode, ExternalError};
use checkin_pipeline_connectors::web_client::UserAgentPolicy;
use checkin_pipeline_core::chain::ChainProfile;
use checkin_pipeline_core::credential::Credential;
use checkin_pipeline_core::signin::SigninProfile;
use evm_wallet_client::{Address, TxPolicyConfig};
use thiserror::Error;

/// ABI surface of the check-in contract. One write method, no arguments.
pub const CHECKIN_CONTRACT_ABI: &[&str] = &["function checkIn()"];

fn expand_tilde(p: &str) -> PathBuf {
    if let Some(stripped) = p.strip_prefix("~/")
        && let Ok(home) = env::var("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(p)
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value in {var}")]
    InvalidValue {
        var: &'static str,
        #[source]
        source: ExternalError,
    },
    #[error("failed to read credential file {path:?}")]
    ReadKeys {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read proxy file {path:?}")]
    ReadProxies {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no usable credentials in {path:?}")]
    NoCredentials { path: PathBuf },
}

impl CodedError for ConfigError {
    fn code(&self) -> ErrorCode {
        match self {
            ConfigError::InvalidValue { .. } => ErrorCode::ConfigInvalidValue,
            ConfigError::ReadKeys { .. } => ErrorCode::ConfigReadKeys,
            ConfigError::ReadProxies { .. } => ErrorCode::ConfigReadProxies,
            ConfigError::NoCredentials { .. } => ErrorCode::ConfigNoCredentials,
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub chain: ChainProfile,
    pub contract_address: Address,
    pub portal_base_url: String,
    pub signin: SigninProfile,
    /// Wallet application label reported to the portal alongside the tx hash.
    pub wallet_app: String,
    pub keys_path: PathBuf,
    pub proxies_path: PathBuf,
    pub export_path: String,
    /// Delay between wallet completions, in milliseconds. Zero disables pacing.
    pub pacing_delay_ms: u64,
    /// Legacy gas price applied to every submission, in wei.
    pub gas_price_wei: u128,
    /// Gas-limit safety margin in basis points of the estimate (12_000 = +20%).
    pub gas_limit_margin_bps: u32,
    pub http_timeout_ms: u64,
    /// Fixed User-Agent override; `None` randomizes per wallet context.
    pub user_agent: Option<String>,
}

impl Config {
    pub fn load() -> ConfigResult<Arc<Self>> {
        let ChainProfile {
            name,
            chain_id,
            symbol,
            rpc_url,
            explorer_tx_base,
        } = ChainProfile::monad_testnet();

        let chain = ChainProfile {
            name: env::var("CHAIN_NAME").unwrap_or(name),
            chain_id: env::var("CHAIN_ID")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(chain_id),
            symbol: env::var("CHAIN_SYMBOL").unwrap_or(symbol),
            rpc_url: env::var("EVM_RPC_URL").unwrap_or(rpc_url),
            explorer_tx_base: env::var("EXPLORER_TX_BASE").unwrap_or(explorer_tx_base),
        };

        let contract_raw = env::var("CHECKIN_CONTRACT").unwrap_or_else(|_| DEFAULT_CONTRACT.to_string());
        let contract_address = contract_raw
            .parse::<Address>()
            .map_err(|e| ConfigError::InvalidValue {
                var: "CHECKIN_CONTRACT",
                source: ExternalError::from(e.to_string()),
            })?;

        let portal_base_url = env::var("PORTAL_BASE_URL").unwrap_or_else(|_| DEFAULT_PORTAL_BASE_URL.to_string());
        let signin = SigninProfile {
            domain: env::var("SIGNIN_DOMAIN").unwrap_or_else(|_| DEFAULT_SIGNIN_DOMAIN.to_string()),
            uri: env::var("SIGNIN_URI").unwrap_or_else(|_| DEFAULT_SIGNIN_URI.to_string()),
        };
        let wallet_app = env::var("WALLET_APP").unwrap_or_else(|_| DEFAULT_WALLET_APP.to_string());

        let keys_path = expand_tilde(&env::var("KEYS_FILE").unwrap_or_else(|_| DEFAULT_KEYS_FILE.to_string()));
        let proxies_path = expand_tilde(&env::var("PROXIES_FILE").unwrap_or_else(|_| DEFAULT_PROXIES_FILE.to_string()));
        let export_path = env::var("EXPORT_PATH").unwrap_or_else(|_| DEFAULT_EXPORT_PATH.to_string());

        let user_agent = env::var("USER_AGENT")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let tunables = parse_checkin_tunables_from_env();

        Ok(Arc::new(Config {
            chain,
            contract_address,
            portal_base_url,
            signin,
            wallet_app,
            keys_path,
            proxies_path,
            export_path,
            pacing_delay_ms: tunables.pacing_delay_ms,
            gas_price_wei: tunables.gas_price_wei,
            gas_limit_margin_bps: tunables.gas_limit_margin_bps,
            http_timeout_ms: tunables.http_timeout_ms,
            user_agent,
        }))
    }

    pub fn user_agent_policy(&self) -> UserAgentPolicy {
        match &self.user_agent {
            Some(agent) => UserAgentPolicy::Fixed(agent.clone()),
            None => UserAgentPolicy::Randomized,
        }
    }

    pub fn tx_policy(&self) -> TxPolicyConfig {
        TxPolicyConfig {
            gas_price_wei: Some(self.gas_price_wei),
            gas_limit_multiplier_bps: self.gas_limit_margin_bps,
            ..TxPolicyConfig::default()
        }
    }
}

/// Reads one private key per line; blank lines and `#` comments are skipped.
pub fn load_credentials(path: &Path) -> ConfigResult<Vec<Credential>> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadKeys {
        path: path.to_path_buf(),
        source,
    })?;

    let credentials: Vec<Credential> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(Credential::new)
        .collect();

    if credentials.is_empty() {
        return Err(ConfigError::NoCredentials {
            path: path.to_path_buf(),
        });
    }
    Ok(credentials)
}

/// Reads raw proxy lines with the same filtering. A missing file means no
/// proxies, not an error; parsing happens later, per wallet.
pub fn load_proxy_lines(path: &Path) -> ConfigResult<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadProxies {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CheckinTunables {
    pacing_delay_ms: u64,
    gas_price_wei: u128,
    gas_limit_margin_bps: u32,
    http_timeout_ms: u64,
}

const DEFAULT_CONTRACT: &str = "0x703e753E9a2aCa1194DED65833EAec17dcFeAc1b";
const DEFAULT_PORTAL_BASE_URL: &str = "https://wallet-collection-api.apr.io";
const DEFAULT_SIGNIN_DOMAIN: &str = "of.apr.io";
const DEFAULT_SIGNIN_URI: &str = "https://of.apr.io";
const DEFAULT_WALLET_APP: &str = "OKX";
const DEFAULT_KEYS_FILE: &str = "config/private_keys.txt";
const DEFAULT_PROXIES_FILE: &str = "config/proxies.txt";
const DEFAULT_EXPORT_PATH: &str = "checkins.csv";

const DEFAULT_PACING_DELAY_MS: u64 = 2_000;
const DEFAULT_GAS_PRICE_WEI: u128 = 55_000_000_000;
const DEFAULT_GAS_LIMIT_MARGIN_BPS: u32 = 12_000;
// Below 10_000 the "margin" would shrink the estimate.
const MIN_GAS_LIMIT_MARGIN_BPS: u32 = 10_000;
const MAX_GAS_LIMIT_MARGIN_BPS: u32 = 50_000;
const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

fn parse_checkin_tunables_from_env() -> CheckinTunables {
    let pacing_delay_ms = env::var("CHECKIN_PACING_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_PACING_DELAY_MS);

    let gas_price_wei = env::var("CHECKIN_GAS_PRICE_WEI")
        .ok()
        .and_then(|v| v.parse::<u128>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_GAS_PRICE_WEI);

    let gas_limit_margin_bps = env::var("CHECKIN_GAS_MARGIN_BPS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .map(|v| v.clamp(MIN_GAS_LIMIT_MARGIN_BPS, MAX_GAS_LIMIT_MARGIN_BPS))
        .unwrap_or(DEFAULT_GAS_LIMIT_MARGIN_BPS);

    let http_timeout_ms = env::var("CHECKIN_HTTP_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_MS);

    CheckinTunables {
        pacing_delay_ms,
        gas_price_wei,
        gas_limit_margin_bps,
        http_timeout_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    const ALL_VARS: &[&str] = &[
        "CHAIN_NAME",
        "CHAIN_ID",
        "CHAIN_SYMBOL",
        "EVM_RPC_URL",
        "EXPLORER_TX_BASE",
        "CHECKIN_CONTRACT",
        "PORTAL_BASE_URL",
        "SIGNIN_DOMAIN",
        "SIGNIN_URI",
        "WALLET_APP",
        "KEYS_FILE",
        "PROXIES_FILE",
        "EXPORT_PATH",
        "USER_AGENT",
        "CHECKIN_PACING_MS",
        "CHECKIN_GAS_PRICE_WEI",
        "CHECKIN_GAS_MARGIN_BPS",
        "CHECKIN_HTTP_TIMEOUT_MS",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    fn parse_checkin_tunables_uses_defaults() {
        let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
        clear_env();

        let parsed = parse_checkin_tunables_from_env();
        assert_eq!(
            parsed,
            CheckinTunables {
                pacing_delay_ms: 2_000,
                gas_price_wei: 55_000_000_000,
                gas_limit_margin_bps: 12_000,
                http_timeout_ms: 10_000,
            }
        );
    }

    #[test]
    fn parse_checkin_tunables_respects_overrides() {
        let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
        clear_env();
        unsafe {
            env::set_var("CHECKIN_PACING_MS", "0");
            env::set_var("CHECKIN_GAS_PRICE_WEI", "1000000000");
            env::set_var("CHECKIN_GAS_MARGIN_BPS", "15000");
            env::set_var("CHECKIN_HTTP_TIMEOUT_MS", "30000");
        }

        let parsed = parse_checkin_tunables_from_env();
        assert_eq!(
            parsed,
            CheckinTunables {
                pacing_delay_ms: 0,
                gas_price_wei: 1_000_000_000,
                gas_limit_margin_bps: 15_000,
                http_timeout_ms: 30_000,
            }
        );
    }

    #[test]
    fn parse_checkin_tunables_clamps_invalid_values() {
        let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
        clear_env();
        unsafe {
            env::set_var("CHECKIN_PACING_MS", "not-a-number");
            env::set_var("CHECKIN_GAS_PRICE_WEI", "0");
            env::set_var("CHECKIN_GAS_MARGIN_BPS", "5000");
            env::set_var("CHECKIN_HTTP_TIMEOUT_MS", "0");
        }

        let parsed = parse_checkin_tunables_from_env();
        assert_eq!(parsed.pacing_delay_ms, 2_000);
        assert_eq!(parsed.gas_price_wei, 55_000_000_000);
        assert_eq!(parsed.gas_limit_margin_bps, 10_000);
        assert_eq!(parsed.http_timeout_ms, 10_000);
    }

    #[test]
    fn load_uses_deployment_defaults() {
        let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
        clear_env();

        let config = Config::load().unwrap();
        assert_eq!(config.chain, ChainProfile::monad_testnet());
        assert_eq!(
            config.contract_address,
            DEFAULT_CONTRACT.parse::<Address>().unwrap()
        );
        assert_eq!(config.portal_base_url, "https://wallet-collection-api.apr.io");
        assert_eq!(config.signin.domain, "of.apr.io");
        assert_eq!(config.wallet_app, "OKX");
        assert_eq!(config.keys_path, PathBuf::from("config/private_keys.txt"));
        assert_eq!(config.export_path, "checkins.csv");
        assert!(config.user_agent.is_none());
        assert!(matches!(config.user_agent_policy(), UserAgentPolicy::Randomized));
    }

    #[test]
    fn load_rejects_malformed_contract_address() {
        let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
        clear_env();
        unsafe { env::set_var("CHECKIN_CONTRACT", "not-an-address") };

        let err = Config::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "CHECKIN_CONTRACT", .. }));

        clear_env();
    }

    #[test]
    fn tx_policy_carries_gas_settings() {
        let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
        clear_env();

        let config = Config::load().unwrap();
        let policy = config.tx_policy();
        assert_eq!(policy.gas_price_wei, Some(55_000_000_000));
        assert_eq!(policy.gas_limit_multiplier_bps, 12_000);
        assert_eq!(policy.confirm_blocks, 1);
    }

    #[test]
    fn load_credentials_filters_blanks_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.txt");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "# operator wallets").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "0xaaaa").unwrap();
        writeln!(file, "  0xbbbb  ").unwrap();

        let credentials = load_credentials(&path).unwrap();
        assert_eq!(credentials.len(), 2);
        assert_eq!(credentials[0].reveal(), "0xaaaa");
        assert_eq!(credentials[1].reveal(), "0xbbbb");
    }

    #[test]
    fn load_credentials_rejects_empty_sets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.txt");
        fs::write(&path, "# nothing here\n\n").unwrap();

        let err = load_credentials(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { .. }));
    }

    #[test]
    fn load_credentials_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_credentials(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadKeys { .. }));
    }

    #[test]
    fn missing_proxy_file_means_no_proxies() {
        let dir = tempfile::tempdir().unwrap();
        let lines = load_proxy_lines(&dir.path().join("absent.txt")).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn load_proxy_lines_keeps_raw_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxies.txt");
        fs::write(&path, "# pool\n10.0.0.1:1080\n\nsocks5://10.0.0.2:1080\n").unwrap();

        let lines = load_proxy_lines(&path).unwrap();
        assert_eq!(lines, vec!["10.0.0.1:1080", "socks5://10.0.0.2:1080"]);
    }
}
