use std::time::Duration;

use checkin_pipeline_commons::error::{CodedError, ErrorCode, format_with_code};
use rand::seq::SliceRandom;
use serde_json::Value;
use thiserror::Error;

use crate::proxy::ProxyBinding;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
];

/// Failure taxonomy for one HTTP exchange.
///
/// `NoResponse` means the request left but no reply ever came back
/// (connect/timeout). `RequestSetup` means the request could not be built or
/// dispatched at all. `Status` carries a server reply with an error code.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("no response from server: {message}")]
    NoResponse { message: String },
    #[error("request setup failed: {message}")]
    RequestSetup { message: String },
    #[error("http status {status}: {body}")]
    Status { status: u16, body: String },
}

impl CodedError for WebError {
    fn code(&self) -> ErrorCode {
        match self {
            WebError::NoResponse { .. } => ErrorCode::ConnectorNoResponse,
            WebError::RequestSetup { .. } => ErrorCode::ConnectorRequestSetup,
            WebError::Status { .. } => ErrorCode::ConnectorHttpStatus,
        }
    }
}

/// Identification header policy, resolved once per client construction.
#[derive(Debug, Clone)]
pub enum UserAgentPolicy {
    /// One agent picked from a pool of real browser strings.
    Randomized,
    Fixed(String),
}

impl UserAgentPolicy {
    fn resolve(&self) -> String {
        match self {
            UserAgentPolicy::Fixed(agent) => agent.clone(),
            UserAgentPolicy::Randomized => USER_AGENT_POOL
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(FALLBACK_USER_AGENT)
                .to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebClientConfig {
    pub timeout: Duration,
    pub user_agent: UserAgentPolicy,
    pub proxy: Option<ProxyBinding>,
}

impl Default for WebClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: UserAgentPolicy::Randomized,
            proxy: None,
        }
    }
}

/// Normalized status/body pair for a successful exchange.
#[derive(Debug, Clone)]
pub struct WebResponse {
    pub status: u16,
    pub body: Value,
}

/// One transport instance per wallet context.
///
/// Timeout, User-Agent, and proxy are fixed at construction and never change;
/// bearer tokens are composed per request. Never shared across wallets.
pub struct WebClient {
    client: reqwest::Client,
}

impl WebClient {
    pub fn new(config: WebClientConfig) -> Result<Self, WebError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.resolve());

        if let Some(binding) = &config.proxy {
            let proxy = binding.to_reqwest().map_err(|e| WebError::RequestSetup {
                message: format_with_code(&e),
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| WebError::RequestSetup {
            message: e.to_string(),
        })?;

        Ok(Self { client })
    }

    pub async fn get_json(&self, url: &str) -> Result<WebResponse, WebError> {
        self.dispatch(self.client.get(url)).await
    }

    pub async fn post_json(
        &self,
        url: &str,
        body: &Value,
        bearer: Option<&str>,
    ) -> Result<WebResponse, WebError> {
        let mut request = self.client.post(url).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        self.dispatch(request).await
    }

    async fn dispatch(&self, request: reqwest::RequestBuilder) -> Result<WebResponse, WebError> {
        let response = request.send().await.map_err(classify_transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            return Err(WebError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let body = if text.is_empty() {
            Value::Null
        } else {
            // Non-JSON success bodies are kept verbatim as a string value
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(WebResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn classify_transport_error(err: reqwest::Error) -> WebError {
    if err.is_builder() || err.is_request() {
        WebError::RequestSetup {
            message: err.to_string(),
        }
    } else {
        // connect errors, timeouts, and mid-stream failures: no usable reply
        WebError::NoResponse {
            message: err.to_string(),
        }
    }
}
