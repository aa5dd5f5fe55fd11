use aws_lambda_events::event::s3::S3EventRecord;
use lambda_runtime::tracing;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use crate::pipeline::ThumbnailOutcome;

pub(crate) const GENERATED_MESSAGE: &str = "Thumbnail generated successfully";
pub(crate) const SKIPPED_MESSAGE: &str = "Skipped thumbnail file";
pub(crate) const DEGRADED_MESSAGE: &str = "Original upload successful, thumbnail generation failed";

/// Payloads the function accepts: a direct invoke naming one object, or an
/// S3 notification for one or more uploads.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum ThumbnailRequest {
    Invoke {
        arguments: InvokeArguments,
    },
    S3 {
        #[serde(rename = "Records")]
        records: Vec<S3EventRecord>,
    },
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InvokeArguments {
    pub(crate) object_key: String,
}

/// An object to thumbnail. `bucket` is only set for S3 notifications; direct
/// invokes always use the configured bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ObjectRef {
    pub(crate) bucket: Option<String>,
    pub(crate) key: String,
}

impl ThumbnailRequest {
    pub(crate) fn into_objects(self) -> Vec<ObjectRef> {
        match self {
            Self::Invoke { arguments } => vec![ObjectRef {
                bucket: None,
                key: arguments.object_key,
            }],
            Self::S3 { records } => records
                .into_iter()
                .filter_map(|record| {
                    let Some(key) = record.s3.object.key else {
                        tracing::warn!("Skipping S3 record without an object key");
                        return None;
                    };
                    Some(ObjectRef {
                        bucket: record.s3.bucket.name,
                        key: decode_s3_key(&key),
                    })
                })
                .collect(),
        }
    }

    pub(crate) fn is_batch(&self) -> bool {
        matches!(self, Self::S3 { .. })
    }
}

/// S3 notifications carry form-encoded keys: `+` for spaces, `%XX` for the rest.
pub(crate) fn decode_s3_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ThumbnailRecord {
    pub(crate) message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) original_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) thumbnail_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) thumbnail_size: Option<usize>,
}

impl From<ThumbnailOutcome> for ThumbnailRecord {
    fn from(outcome: ThumbnailOutcome) -> Self {
        match outcome {
            ThumbnailOutcome::Generated {
                original_key,
                thumbnail_key,
                thumbnail_size,
            } => Self {
                message: GENERATED_MESSAGE,
                error: None,
                original_key: Some(original_key),
                thumbnail_key: Some(thumbnail_key),
                thumbnail_size: Some(thumbnail_size),
            },
            ThumbnailOutcome::Skipped => Self {
                message: SKIPPED_MESSAGE,
                error: None,
                original_key: None,
                thumbnail_key: None,
                thumbnail_size: None,
            },
            ThumbnailOutcome::Degraded {
                original_key,
                error,
            } => Self {
                message: DEGRADED_MESSAGE,
                error: Some(error),
                original_key: Some(original_key),
                thumbnail_key: None,
                thumbnail_size: None,
            },
        }
    }
}

/// One record for a direct invoke, one per S3 record for notifications.
#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub(crate) enum ThumbnailResponse {
    Single(ThumbnailRecord),
    Batch(Vec<ThumbnailRecord>),
}
