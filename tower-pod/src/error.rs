//! Bridge error types

use tower_api::ApiError;

/// Errors raised while serving an invoke request
///
/// Each one is reported to the host as an error response; `kind()` is the
/// classification tag carried in `ex-data`.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Cannot convert argument '{param}': {source}")]
    Marshal {
        param: String,
        #[source]
        source: ApiError,
    },

    #[error("{op}: {message}")]
    InvalidArguments { op: &'static str, message: String },

    #[error("Encryption failed: {0}")]
    Crypto(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BridgeError {
    pub fn invalid_arguments(op: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            op,
            message: message.into(),
        }
    }

    pub fn crypto(msg: impl ToString) -> Self {
        Self::Crypto(msg.to_string())
    }

    /// Classification tag written into `ex-data`
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::UnknownOperation(_) => "UnknownOperation",
            BridgeError::MalformedRequest(_) => "MalformedRequest",
            BridgeError::Marshal { .. } => "MarshalError",
            BridgeError::InvalidArguments { .. } => "ArgumentError",
            BridgeError::Crypto(_) => "CryptoError",
            BridgeError::Api(e) => e.kind(),
            BridgeError::Json(_) => "JsonError",
        }
    }
}
