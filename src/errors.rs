use thiserror::Error;

/// Failure of a single chat completion request.
///
/// Every variant except `EmptyMessage` is treated as transient by the
/// pipeline and retried the same way. The variant never reaches the user;
/// it is only logged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("message is empty")]
    EmptyMessage,

    /// Transport-level failure: DNS, connection refused, CORS, body read.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx status. `message` comes from `{"error": {"message": ...}}`
    /// when the body has one.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 2xx response whose body is not a usable completion.
    #[error("unexpected response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        RequestError::Network(err.to_string())
    }
}
