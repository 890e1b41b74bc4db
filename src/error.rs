use thiserror::Error;

/// Any failure between a submitted form and a transfer fee estimate.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model is not loaded: {0}")]
    ModelUnavailable(String),

    #[error("Feature mismatch: {0}")]
    FeatureMismatch(String),

    #[error("Model produced a non-finite estimate ({0})")]
    NonFinite(f64),

    #[error("Failed to load model artifact '{path}': {reason}")]
    Artifact {
        path: String,
        reason: String,
    },
}

/// Failure talking to the chat-completion endpoint.
#[derive(Debug, Error)]
pub enum ChatTransportError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: u16,
    },

    #[error("Unexpected reply from {url}: {reason}")]
    Decode {
        url: String,
        reason: String,
    },
}
