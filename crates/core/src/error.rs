use thiserror::Error;

#[derive(Error, Debug)]
pub enum Force10Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Route list error: {0}")]
    RouteList(String),
}

pub type Result<T> = std::result::Result<T, Force10Error>;
