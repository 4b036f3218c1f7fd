use thiserror::Error;

/// Failure of a request to the search service.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The service answered with a status of 400 or above.
    #[error("Search service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Could not reach the search service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected response from the search service: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SearchError {
    /// HTTP status carried by the error, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            SearchError::Status { status, .. } => Some(*status),
            SearchError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
