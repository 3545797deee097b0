use std::fmt;

/// Raw private-key material for one wallet.
///
/// Owned by exactly one workflow context for its lifetime. The key is only
/// handed to the signer constructor; `Debug` never renders it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw key. Callers must not log the result.
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Formats the 1-based wallet id used in logs and reports: `wallet-001`.
pub fn wallet_id(index: usize) -> String {
    format!("wallet-{index:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_the_key() {
        let credential = Credential::new("0xdeadbeef");
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("deadbeef"));
        assert_eq!(rendered, "Credential(<redacted>)");
    }

    #[test]
    fn reveal_returns_the_raw_key() {
        let credential = Credential::new("0xdeadbeef");
        assert_eq!(credential.reveal(), "0xdeadbeef");
    }

    #[test]
    fn wallet_ids_are_zero_padded_to_three_digits() {
        assert_eq!(wallet_id(1), "wallet-001");
        assert_eq!(wallet_id(12), "wallet-012");
        assert_eq!(wallet_id(123), "wallet-123");
        assert_eq!(wallet_id(1234), "wallet-1234");
    }
}
