use thiserror::Error;

/// Unified error type for the search widget library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Errors while rewriting `ipfs://` image references.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("invalid CID {identifier:?}: {reason}")]
    InvalidCid { identifier: String, reason: String },

    #[error("cannot convert CID {identifier:?} to v1: {reason}")]
    Conversion { identifier: String, reason: String },
}

/// Errors while loading a network's collection directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("directory {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("directory not found: {url}")]
    NotFound { url: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Failure reported by the external NFT fetching collaborator.
///
/// `Typed` carries a proper error message; `Unknown` wraps whatever
/// opaque value the collaborator produced instead.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("{message}")]
    Typed { message: String },

    #[error("unknown error: {0}")]
    Unknown(serde_json::Value),
}

impl FetchError {
    pub fn typed(message: impl Into<String>) -> Self {
        FetchError::Typed {
            message: message.into(),
        }
    }
}
