use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown activation function: {0}")]
    UnknownActivation(String),

    #[error("malformed IDX data: {0}")]
    Format(String),

    #[error("not a valid network: {0}")]
    InvalidNetwork(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetError>;
