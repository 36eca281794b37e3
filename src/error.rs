use std::io;

use thiserror::Error;

/// Why a level code could not be loaded.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level code is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("level code does not decode to UTF-8 text")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("level code is not a list of level records: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level file: {0}")]
    Io(#[from] io::Error),
}

/// Failure reading or writing one of the small JSON files on disk.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}
