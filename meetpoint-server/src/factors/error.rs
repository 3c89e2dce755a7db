//! Factor store error types.

use std::path::PathBuf;

/// Errors that can occur when loading factor data.
#[derive(Debug, thiserror::Error)]
pub enum FactorStoreError {
    /// The fixture file could not be read
    #[error("failed to read factor data {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fixture is not valid factor JSON
    #[error("failed to parse factor data: {0}")]
    Json(#[from] serde_json::Error),
}
