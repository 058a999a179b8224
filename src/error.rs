use thiserror::Error;

/// Failures that abort a whole search. Per-record problems never end up here.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The occurrence feed answered with a `warnings` block instead of results.
    #[error("{0}")]
    UpstreamWarning(String),

    /// The interval feed held no intervals, or answered with an error block.
    #[error("time scale unavailable: {0}")]
    TimeScale(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("giving up on {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SearchError {
    pub fn is_upstream_warning(&self) -> bool {
        matches!(self, SearchError::UpstreamWarning(_))
    }
}
