//! Error types.
//!
//! Layout and interaction never fail: every condition they meet is resolved
//! locally and logged. These errors only surface where the host asks for
//! something that can genuinely fail, such as parsing a payload or talking to
//! a storage backend.

use thiserror::Error;

/// Failure to turn host text into a graph descriptor or options object.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not find a JSON object in payload starting with {preview:?}")]
    NoJsonObject { preview: String },
}

/// Failure of a position store backend. Always non-fatal for the engine.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("position storage is unavailable")]
    Unavailable,

    #[error("failed to read saved positions for {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write saved positions for {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("saved positions are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
