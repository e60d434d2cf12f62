use thiserror::Error;

/// Terminal failure of one thumbnail invocation. Nothing is retried locally;
/// redelivery is left to the invoking notification system.
#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("Malformed S3 event: {0}")]
    MalformedEvent(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode thumbnail: {0}")]
    Encode(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FetchError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Access denied to object: {bucket}/{key}")]
    AccessDenied { bucket: String, key: String },

    #[error("Failed to fetch {bucket}/{key}: {message}")]
    Other {
        bucket: String,
        key: String,
        message: String,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Failed to upload thumbnail to {bucket}/{key}: {message}")]
    Rejected {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Upload of {bucket}/{key} was not acknowledged by the store")]
    Unacknowledged { bucket: String, key: String },
}
