use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
