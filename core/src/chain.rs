use serde::{Deserialize, Serialize};

/// Static description of the target chain and its companion explorer.
///
/// One profile is resolved at startup and shared read-only by every wallet
/// context; per-wallet state (providers, signers) never lives here.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainProfile {
    pub name: String,
    pub chain_id: u64,
    pub symbol: String,
    pub rpc_url: String,
    /// Prefix joined with a transaction hash to form a browsable link.
    pub explorer_tx_base: String,
}

impl ChainProfile {
    pub fn monad_testnet() -> Self {
        Self {
            name: "Monad Testnet".to_string(),
            chain_id: 10_143,
            symbol: "MON".to_string(),
            rpc_url: "https://testnet-rpc.monad.xyz".to_string(),
            explorer_tx_base: "https://testnet.monadexplorer.com/tx/".to_string(),
        }
    }

    pub fn explorer_tx_url(&self, tx_hash: &str) -> String {
        format!("{}{}", self.explorer_tx_base, tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monad_testnet_profile() {
        let profile = ChainProfile::monad_testnet();
        assert_eq!(profile.chain_id, 10_143);
        assert_eq!(profile.symbol, "MON");
        assert!(profile.rpc_url.starts_with("https://"));
    }

    #[test]
    fn explorer_link_joins_base_and_hash() {
        let profile = ChainProfile::monad_testnet();
        let url = profile.explorer_tx_url("0xabc");
        assert_eq!(url, "https://testnet.monadexplorer.com/tx/0xabc");
    }
}
