use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("invalid format: {0}")]
    InvalidFormat(#[from] serde_json::Error),
}
