use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;

use crate::error::StoreError;

/// Read/write access to the bucket holding originals and thumbnails.
#[async_trait]
pub(crate) trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        let output = self
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match e.as_service_error() {
                Some(service_err) if service_err.is_no_such_key() => StoreError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                },
                _ => StoreError::Read(DisplayErrorContext(&e).to_string()),
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Read(format!("failed to read body of {bucket}/{key}: {e}")))?;

        Ok(body.into_bytes())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> Result<(), StoreError> {
        self.put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .cache_control(cache_control)
            .send()
            .await
            .map_err(|e| StoreError::Write(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::operation::get_object::{GetObjectError, GetObjectOutput};
    use aws_sdk_s3::operation::put_object::{PutObjectError, PutObjectOutput};
    use aws_sdk_s3::types::error::{InvalidRequest, NoSuchKey};
    use aws_smithy_mocks::{mock, mock_client};

    #[tokio::test]
    async fn test_get_object_returns_body() {
        let get_object_rule = mock!(aws_sdk_s3::Client::get_object)
            .match_requests(|req| {
                req.bucket() == Some("test-bucket") && req.key() == Some("photos/dog.jpg")
            })
            .then_output(|| {
                GetObjectOutput::builder()
                    .body(ByteStream::from_static(b"image-bytes"))
                    .build()
            });
        let s3 = mock_client!(aws_sdk_s3, [&get_object_rule]);

        let body = ObjectStore::get_object(&s3, "test-bucket", "photos/dog.jpg")
            .await
            .unwrap();
        assert_eq!(get_object_rule.num_calls(), 1);
        assert_eq!(&body[..], b"image-bytes");
    }

    #[tokio::test]
    async fn test_get_object_maps_no_such_key() {
        let get_object_rule = mock!(aws_sdk_s3::Client::get_object)
            .then_error(|| GetObjectError::NoSuchKey(NoSuchKey::builder().build()));
        let s3 = mock_client!(aws_sdk_s3, [&get_object_rule]);

        let err = ObjectStore::get_object(&s3, "test-bucket", "missing.jpg")
            .await
            .unwrap_err();
        assert!(
            matches!(err, StoreError::NotFound { ref bucket, ref key } if bucket == "test-bucket" && key == "missing.jpg")
        );
    }

    #[tokio::test]
    async fn test_put_object_sets_headers() {
        let put_object_rule = mock!(aws_sdk_s3::Client::put_object)
            .match_requests(|req| {
                req.bucket() == Some("test-bucket")
                    && req.key() == Some("photos/dog_thumb.jpg")
                    && req.content_type() == Some("image/jpeg")
                    && req.cache_control() == Some("max-age=31536000")
            })
            .then_output(|| PutObjectOutput::builder().build());
        let s3 = mock_client!(aws_sdk_s3, [&put_object_rule]);

        ObjectStore::put_object(
            &s3,
            "test-bucket",
            "photos/dog_thumb.jpg",
            vec![0xFF, 0xD8],
            "image/jpeg",
            "max-age=31536000",
        )
        .await
        .unwrap();
        assert_eq!(put_object_rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_put_object_failure_is_write_error() {
        let put_object_rule = mock!(aws_sdk_s3::Client::put_object)
            .then_error(|| {
                PutObjectError::InvalidRequest(
                    InvalidRequest::builder().message("access denied").build(),
                )
            });
        let s3 = mock_client!(aws_sdk_s3, [&put_object_rule]);

        let err = ObjectStore::put_object(&s3, "b", "k_thumb.jpg", vec![], "image/jpeg", "no-cache")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Write(_)));
    }
}
