use checkin_pipeline_commons::error::{CodedError, ErrorCode, format_with_code};
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid native amount: {input:?}")]
    InvalidAmount {
        input: String,
        #[source]
        source: alloy::primitives::utils::UnitsError,
    },
}

impl CodedError for CoreError {
    fn code(&self) -> ErrorCode {
        match self {
            CoreError::InvalidAmount { .. } => ErrorCode::CoreInvalidAmount,
        }
    }
}

impl From<CoreError> for String {
    fn from(value: CoreError) -> Self {
        format_with_code(&value)
    }
}
