// Error types for EVM operations

#[derive(thiserror::Error, Debug)]
pub enum EvmError {
    #[error("rpc: {0}")]
    Rpc(String),

    #[error("signing: {0}")]
    Signing(String),

    #[error("abi: {0}")]
    Abi(String),

    #[error("unknown contract binding: {0}")]
    UnknownContract(String),

    #[error("unknown method {method} on contract {contract}")]
    UnknownMethod { contract: String, method: String },

    #[error("reverted: {0}")]
    Reverted(String),

    #[error("other: {0}")]
    Other(String),
}

impl From<alloy::transports::RpcError<alloy::transports::TransportErrorKind>> for EvmError {
    fn from(e: alloy::transports::RpcError<alloy::transports::TransportErrorKind>) -> Self {
        EvmError::Rpc(e.to_string())
    }
}

impl From<alloy::hex::FromHexError> for EvmError {
    fn from(e: alloy::hex::FromHexError) -> Self {
        EvmError::Other(e.to_string())
    }
}
