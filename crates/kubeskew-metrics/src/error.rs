use thiserror::Error;

/// Errors raised while submitting a metric sample
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The HTTP request could not be built or sent
    #[error("metric submission failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The intake answered with a non-success status
    #[error("metric submission rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
