use thiserror::Error;

pub const DEFAULT_REJECTION_MESSAGE: &str = "Unknown error";

/// Failures surfaced by the remote project tracker. None of them is retried;
/// every variant is terminal for the invocation that triggered the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Invalid API key")]
    Unauthorized,
    #[error("Resource not found")]
    NotFound,
    #[error("API Error: {0}")]
    Rejected(String),
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn rejected(message: Option<String>) -> Self {
        let message = message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string());
        Self::Rejected(message)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}
