use thiserror::Error;

/// Failures that abort the whole invocation.
#[derive(Error, Debug)]
pub(crate) enum HandlerError {
    #[error("Storage bucket name not found in event or environment")]
    MissingBucket,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Error, Debug)]
pub(crate) enum StoreError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Failed to read object: {0}")]
    Read(String),

    #[error("Failed to write object: {0}")]
    Write(String),
}

#[derive(Error, Debug)]
pub(crate) enum TransformError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to encode JPEG: {0}")]
    Encode(String),
}

/// Failures while producing a thumbnail. These never fail the invocation;
/// they are reported back in the degraded response record.
#[derive(Error, Debug)]
pub(crate) enum ThumbnailError {
    #[error("Failed to fetch original: {0}")]
    Fetch(#[source] StoreError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("Failed to store thumbnail: {0}")]
    Store(#[source] StoreError),

    #[error("Thumbnail task failed: {0}")]
    Worker(String),
}
