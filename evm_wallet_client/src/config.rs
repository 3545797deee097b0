// Configuration structures for the wallet client

#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub rpc_url: String,
    pub chain_id: u64,
}

#[derive(Debug, Clone)]
pub struct TxPolicyConfig {
    // Fixed legacy gas price in wei (None = network pricing)
    pub gas_price_wei: Option<u128>,
    // Gas limit multiplier in basis points (10000 = 100%)
    pub gas_limit_multiplier_bps: u32,
    // Number of blocks to wait for confirmation
    pub confirm_blocks: u64,
    // Timeout for receipt polling in seconds
    pub receipt_timeout_secs: u64,
}

impl Default for TxPolicyConfig {
    fn default() -> Self {
        Self {
            gas_price_wei: None,
            gas_limit_multiplier_bps: 12000, // 120%
            confirm_blocks: 1,
            receipt_timeout_secs: 300,
        }
    }
}

impl TxPolicyConfig {
    /// Applies the basis-point safety margin to an estimated gas limit.
    /// Estimation can race chain-state changes between estimate and submit;
    /// a multiplicative margin stays proportional across contract complexity.
    pub fn gas_limit_with_margin(&self, estimated: u64) -> u64 {
        (estimated as u128 * self.gas_limit_multiplier_bps as u128 / 10_000) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_adds_twenty_percent_and_waits_one_block() {
        let policy = TxPolicyConfig::default();
        assert_eq!(policy.gas_limit_multiplier_bps, 12000);
        assert_eq!(policy.confirm_blocks, 1);
        assert!(policy.gas_price_wei.is_none());
    }

    #[test]
    fn margin_of_default_policy_is_exact() {
        let policy = TxPolicyConfig::default();
        assert_eq!(policy.gas_limit_with_margin(100_000), 120_000);
        assert_eq!(policy.gas_limit_with_margin(21_000), 25_200);
    }

    #[test]
    fn identity_margin_keeps_the_estimate() {
        let policy = TxPolicyConfig {
            gas_limit_multiplier_bps: 10_000,
            ..TxPolicyConfig::default()
        };
        assert_eq!(policy.gas_limit_with_margin(84_321), 84_321);
    }

    #[test]
    fn margin_truncates_toward_zero() {
        let policy = TxPolicyConfig {
            gas_limit_multiplier_bps: 10_001,
            ..TxPolicyConfig::default()
        };
        // 99 * 10001 / 10000 = 99.0099
        assert_eq!(policy.gas_limit_with_margin(99), 99);
    }
}
