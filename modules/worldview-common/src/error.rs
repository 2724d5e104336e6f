use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorldviewError>;

#[derive(Error, Debug)]
pub enum WorldviewError {
    #[error("Unknown filter dimension: {0}")]
    UnknownDimension(String),

    #[error("Data is still loading")]
    Loading,

    #[error("Data failed to load: {0}")]
    LoadFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
