//! API client errors

/// Errors raised by API calls, including argument validation
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status code: {status}\n\nResponse content:\n{content}")]
    UnexpectedStatus { status: u16, content: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("missing required keyword argument: '{0}'")]
    MissingArgument(String),

    #[error("invalid value for argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    #[error("got an unexpected keyword argument '{0}'")]
    UnexpectedArgument(String),

    #[error("cannot construct {model}: {message}")]
    ModelConstruction { model: &'static str, message: String },
}

impl ApiError {
    /// Classification tag for callers that report errors by kind
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "TransportError",
            ApiError::UnexpectedStatus { .. } => "UnexpectedStatus",
            ApiError::Decode(_) => "DecodeError",
            ApiError::MissingArgument(_)
            | ApiError::InvalidArgument { .. }
            | ApiError::UnexpectedArgument(_) => "TypeError",
            ApiError::ModelConstruction { .. } => "ModelConstructionError",
        }
    }
}

/// Result type alias using ApiError
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_display() {
        let err = ApiError::UnexpectedStatus {
            status: 404,
            content: r#"{"detail":"app not found"}"#.into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Unexpected status code: 404"));
        assert!(msg.contains("app not found"));
        assert_eq!(err.kind(), "UnexpectedStatus");
    }

    #[test]
    fn test_argument_errors_share_kind() {
        assert_eq!(ApiError::MissingArgument("name".into()).kind(), "TypeError");
        assert_eq!(ApiError::UnexpectedArgument("x".into()).kind(), "TypeError");
        assert_eq!(
            ApiError::InvalidArgument {
                name: "page".into(),
                message: "expected i64".into()
            }
            .kind(),
            "TypeError"
        );
    }

    #[test]
    fn test_model_construction_display() {
        let err = ApiError::ModelConstruction {
            model: "CreateAppParams",
            message: "missing field `name`".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot construct CreateAppParams: missing field `name`"
        );
    }
}
