use reqwest::StatusCode;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a single API call.
///
/// Transport failures, undecodable payloads and failures reported by the
/// server inside a well-formed envelope are kept apart so callers can match
/// on them instead of inspecting message strings.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("server responded with {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("{message}")]
    Application { message: String },

    /// A response the client treats as impossible. These are bugs in either
    /// the client or the server and should reach a top-level handler.
    #[error("contract violation: {0}")]
    ContractViolation(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server supplied message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            ApiError::Application { message } => Some(message),
            _ => None,
        }
    }

    pub fn is_contract_violation(&self) -> bool {
        matches!(self, ApiError::ContractViolation(_))
    }

    pub(crate) fn contract(detail: impl Into<String>) -> Self {
        ApiError::ContractViolation(detail.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Identifier that does not follow the `Kind_suffix` convention.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UidError {
    #[error("identifier {0:?} has no kind prefix")]
    MissingPrefix(String),
    #[error("identifier {uid:?} has unknown kind prefix {prefix:?}")]
    UnknownKind { uid: String, prefix: String },
    #[error("identifier {uid:?} is a {found}, expected {expected}")]
    WrongKind {
        uid: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl From<UidError> for ApiError {
    fn from(err: UidError) -> Self {
        ApiError::ContractViolation(err.to_string())
    }
}
