use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{ConnectorError, ConnectorResult};
use crate::web_client::WebClient;

/// Body of the check-in record call; field names follow the portal's wire
/// format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRecord {
    pub wallet_address: String,
    pub transaction_hash: String,
    pub chain_id: u64,
    pub wallet_app: String,
}

/// Off-chain collaborator for one wallet context: nonce, login, and the
/// best-effort bookkeeping calls.
#[mockall::automock]
#[async_trait]
pub trait PortalBackend: Send + Sync {
    // auth
    async fn fetch_nonce(&self, address: &str) -> ConnectorResult<String>;

    /// Returns the bearer token on success.
    async fn login(&self, address: &str, signature: &str, message: &str) -> ConnectorResult<String>;

    // bookkeeping
    async fn record_checkin(&self, token: &str, record: &CheckinRecord) -> ConnectorResult<()>;

    async fn update_points(&self, token: &str) -> ConnectorResult<()>;
}

pub struct PortalBackendImpl {
    web: WebClient,
    base_url: String,
}

impl PortalBackendImpl {
    pub fn new(web: WebClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            web,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl PortalBackend for PortalBackendImpl {
    async fn fetch_nonce(&self, address: &str) -> ConnectorResult<String> {
        let url = self.endpoint(&format!("/auth/nonce/{address}"));
        let response = self.web.get_json(&url).await?;
        extract_nonce(&response.body)
    }

    async fn login(&self, address: &str, signature: &str, message: &str) -> ConnectorResult<String> {
        let url = self.endpoint("/auth/login");
        let body = json!({
            "walletAddress": address,
            "signature": signature,
            "message": message,
        });
        let response = self.web.post_json(&url, &body, None).await?;
        extract_access_token(&response.body)
    }

    async fn record_checkin(&self, token: &str, record: &CheckinRecord) -> ConnectorResult<()> {
        let url = self.endpoint("/wallets/checkin");
        let body = serde_json::to_value(record)
            .map_err(|e| ConnectorError::backend(format!("check-in record serialization failed: {e}")))?;
        self.web.post_json(&url, &body, Some(token)).await?;
        Ok(())
    }

    async fn update_points(&self, token: &str) -> ConnectorResult<()> {
        let url = self.endpoint("/users/update-my-points");
        self.web.post_json(&url, &json!({}), Some(token)).await?;
        Ok(())
    }
}

fn extract_nonce(body: &Value) -> ConnectorResult<String> {
    body.get("nonce")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ConnectorError::backend("nonce missing from response"))
}

fn extract_access_token(body: &Value) -> ConnectorResult<String> {
    body.get("access_token")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ConnectorError::backend("access_token missing from login response"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_is_read_from_the_response_body() {
        let body = json!({ "nonce": "a1b2c3" });
        assert_eq!(extract_nonce(&body).unwrap(), "a1b2c3");
    }

    #[test]
    fn missing_or_non_string_nonce_is_a_backend_error() {
        assert!(extract_nonce(&json!({})).is_err());
        assert!(extract_nonce(&json!({ "nonce": 7 })).is_err());
    }

    #[test]
    fn access_token_is_read_from_the_login_body() {
        let body = json!({ "access_token": "jwt-ish" });
        assert_eq!(extract_access_token(&body).unwrap(), "jwt-ish");
    }

    #[test]
    fn missing_access_token_is_a_backend_error() {
        let err = extract_access_token(&json!({ "token": "wrong-key" })).unwrap_err();
        assert!(err.to_string().contains("access_token"));
    }

    #[test]
    fn checkin_record_serializes_with_portal_field_names() {
        let record = CheckinRecord {
            wallet_address: "0xabc".to_string(),
            transaction_hash: "0xdef".to_string(),
            chain_id: 10_143,
            wallet_app: "OKX".to_string(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "walletAddress": "0xabc",
                "transactionHash": "0xdef",
                "chainId": 10_143,
                "walletApp": "OKX",
            })
        );
    }

    #[test]
    fn endpoints_join_without_duplicate_slashes() {
        let web = WebClient::new(Default::default()).unwrap();
        let portal = PortalBackendImpl::new(web, "https://portal.example/");
        assert_eq!(portal.endpoint("/auth/login"), "https://portal.example/auth/login");
    }
}
