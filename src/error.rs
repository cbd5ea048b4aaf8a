use thiserror::Error;

#[derive(Error, Debug)]
pub enum SniperError {
    /// Failure reported by the API, already reduced to a display message.
    #[error("{0}")]
    Api(String),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SniperError>;
