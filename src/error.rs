use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid chunk bounds {min}-{max}: need 1 <= min <= max")]
    InvalidChunkBounds { min: usize, max: usize },

    #[error("chunk bounds must look like MIN-MAX, got {0:?}")]
    InvalidChunkSpec(String),

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("could not install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),
}
