use crate::worker::WorkerState;

// Custom error type for worker operations
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid worker state: expected {expected}, got {actual}")]
    InvalidState {
        expected: &'static str,
        actual: WorkerState,
    },
}
