use bytes::Bytes;
use lambda_runtime::tracing;

use crate::config::Config;
use crate::error::{HandlerError, ThumbnailError};
use crate::request::ObjectRef;
use crate::storage::ObjectStore;
use crate::thumbnail_key::{derive_thumbnail_key, is_thumbnail_key};
use crate::transform::{self, Thumbnail, ThumbnailSpec};

const THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

/// Result of handling one object. Failures to produce the thumbnail are a
/// variant here rather than an `Err`, so the original upload is never
/// reported as failed because of them.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ThumbnailOutcome {
    Generated {
        original_key: String,
        thumbnail_key: String,
        thumbnail_size: usize,
    },
    Skipped,
    Degraded {
        original_key: String,
        error: String,
    },
}

struct StoredThumbnail {
    size: usize,
    width: u32,
    height: u32,
}

/// Runs the fetch → resize → store flow for one object.
///
/// Only a missing bucket is returned as `Err`.
pub(crate) async fn process_object<S>(
    store: &S,
    config: &Config,
    object: ObjectRef,
) -> Result<ThumbnailOutcome, HandlerError>
where
    S: ObjectStore + ?Sized,
{
    let bucket = object
        .bucket
        .or_else(|| config.bucket_name.clone())
        .ok_or(HandlerError::MissingBucket)?;
    let original_key = object.key;

    tracing::info!(bucket = %bucket, key = %original_key, "Processing object");

    if is_thumbnail_key(&original_key) {
        tracing::info!(key = %original_key, "Skipping thumbnail file");
        return Ok(ThumbnailOutcome::Skipped);
    }

    let thumbnail_key = derive_thumbnail_key(&original_key);

    match generate(store, config, &bucket, &original_key, &thumbnail_key).await {
        Ok(stored) => {
            tracing::info!(
                original_key = %original_key,
                thumbnail_key = %thumbnail_key,
                width = stored.width,
                height = stored.height,
                size = stored.size,
                "Thumbnail generated successfully"
            );
            Ok(ThumbnailOutcome::Generated {
                original_key,
                thumbnail_key,
                thumbnail_size: stored.size,
            })
        }
        Err(e) => {
            tracing::error!(key = %original_key, error = %e, "Error processing image");
            Ok(ThumbnailOutcome::Degraded {
                original_key,
                error: e.to_string(),
            })
        }
    }
}

async fn generate<S>(
    store: &S,
    config: &Config,
    bucket: &str,
    original_key: &str,
    thumbnail_key: &str,
) -> Result<StoredThumbnail, ThumbnailError>
where
    S: ObjectStore + ?Sized,
{
    let original = store
        .get_object(bucket, original_key)
        .await
        .map_err(ThumbnailError::Fetch)?;

    let Thumbnail {
        data,
        width,
        height,
    } = resize_on_worker(original, config.thumbnail).await?;
    let size = data.len();

    store
        .put_object(
            bucket,
            thumbnail_key,
            data,
            THUMBNAIL_CONTENT_TYPE,
            &config.cache_control,
        )
        .await
        .map_err(ThumbnailError::Store)?;

    Ok(StoredThumbnail {
        size,
        width,
        height,
    })
}

async fn resize_on_worker(original: Bytes, spec: ThumbnailSpec) -> Result<Thumbnail, ThumbnailError> {
    tokio::task::spawn_blocking(move || transform::resize(&original, &spec))
        .await
        .map_err(|e| ThumbnailError::Worker(e.to_string()))?
        .map_err(ThumbnailError::from)
}
