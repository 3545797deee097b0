use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

const SIGNIN_VERSION: &str = "1";
const EXPIRY_HOURS: i64 = 24;

/// Origin the sign-in message claims. The remote service validates the
/// rendered text verbatim during login, so field values must match its
/// expectations exactly.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SigninProfile {
    pub domain: String,
    pub uri: String,
}

impl SigninProfile {
    /// Renders the exact text the wallet signs.
    ///
    /// Pure: identical `(address, chain_id, nonce, issued_at)` inputs yield
    /// byte-identical output. Expiration is always issue time plus 24 hours;
    /// timestamps use millisecond precision with a `Z` suffix.
    pub fn build_message(
        &self,
        address: &str,
        chain_id: u64,
        nonce: &str,
        issued_at: DateTime<Utc>,
    ) -> String {
        let issued = issued_at.to_rfc3339_opts(SecondsFormat::Millis, true);
        let expires = (issued_at + Duration::hours(EXPIRY_HOURS))
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        format!(
            "{domain} wants you to sign in with your Ethereum account:\n\
             {address}\n\
             \n\
             Please sign this message to verify your account ownership.\n\
             \n\
             URI: {uri}\n\
             Version: {version}\n\
             Chain ID: {chain_id}\n\
             Nonce: {nonce}\n\
             Issued At: {issued}\n\
             Expiration Time: {expires}",
            domain = self.domain,
            uri = self.uri,
            version = SIGNIN_VERSION,
        )
    }
}
