use reqwest::StatusCode;
use thiserror::Error;

/// Fallback message for failed responses with no usable error body.
pub const SERVER_ERROR: &str = "Server error";

pub type Result<T> = std::result::Result<T, StagingError>;

#[derive(Debug, Error)]
pub enum StagingError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success response. `message` is the normalized server message, so
    /// it is what callers should surface to the user.
    #[error("{message}")]
    Server { status: StatusCode, message: String },

    /// Success response whose body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The host auth provider could not produce a token.
    #[error("auth provider error: {0}")]
    Auth(String),
}

/// Normalize a failed response body to a user-facing message: the body's
/// `error` field when it carries one, else `"Server error"`.
pub(crate) fn normalize_error_body(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .unwrap_or_else(|| SERVER_ERROR.to_string())
}
