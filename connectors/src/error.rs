use checkin_pipeline_commons::error::{CodedError, ErrorCode, ExternalError, format_with_code};
use thiserror::Error;

use crate::web_client::WebError;

pub type ConnectorResult<T> = Result<T, ConnectorError>;

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("backend error: {source}")]
    Backend {
        #[source]
        source: ExternalError,
    },
    #[error(transparent)]
    Web(#[from] WebError),
}

impl ConnectorError {
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<ExternalError>,
    {
        ConnectorError::Backend { source: err.into() }
    }
}

impl From<ConnectorError> for ExternalError {
    fn from(value: ConnectorError) -> Self {
        ExternalError(value.to_string())
    }
}

impl From<ConnectorError> for String {
    fn from(value: ConnectorError) -> Self {
        format_with_code(&value)
    }
}

impl CodedError for ConnectorError {
    fn code(&self) -> ErrorCode {
        match self {
            ConnectorError::InvalidInput { .. } => ErrorCode::ConnectorInvalidInput,
            ConnectorError::Backend { .. } => ErrorCode::ConnectorBackend,
            ConnectorError::Web(err) => err.code(),
        }
    }
}
