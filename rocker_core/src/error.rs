use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum RockerError {
    #[error("invalid state: {0}")]
    State(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("timer fault: {0}")]
    Timer(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing drag extent")]
    MissingExtent,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
