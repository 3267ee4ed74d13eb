use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GcpError>;

#[derive(Debug, Error)]
pub enum GcpError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gcp api error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("operation {name} failed: {message}")]
    Operation { name: String, message: String },

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Standard GCP error envelope: `{"error": {"code": 404, "message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<u16>,
    message: Option<String>,
}

impl GcpError {
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error.message)
            .unwrap_or_else(|| body.to_string());

        GcpError::Api { status, message }
    }
}
