use std::time::Duration;

/// Failure of a single HTTP attempt. Always eligible for retry on GET requests.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("could not connect to {0}")]
    Connect(String),
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response body: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("HTTP client error: {0}")]
    Transport(#[source] reqwest::Error),
}

impl RequestError {
    /// HTTP status of the failed attempt, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Fatal failure of a patient retrieval. No partial dataset survives it.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("request to {endpoint} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        endpoint: String,
        attempts: u32,
        #[source]
        source: RequestError,
    },
    #[error("Invalid response format on page {page}")]
    InvalidResponseFormat { page: u32 },
}

/// Failure of the single-shot assessment submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("assessment rejected with HTTP {status}: {body}")]
    Rejected {
        status: u16,
        body: serde_json::Value,
    },
    #[error("failed to submit assessment: {0}")]
    Request(#[from] RequestError),
}

/// Failure to construct the HTTP client from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ClientSetupError {
    #[error("API_KEY is not a valid HTTP header value")]
    InvalidApiKey(#[source] reqwest::header::InvalidHeaderValue),
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}
