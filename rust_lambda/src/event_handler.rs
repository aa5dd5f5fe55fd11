use lambda_runtime::{tracing, Error, LambdaEvent};

use crate::config::Config;
use crate::pipeline::process_object;
use crate::request::{ThumbnailRecord, ThumbnailRequest, ThumbnailResponse};
use crate::storage::ObjectStore;

pub(crate) async fn function_handler<S>(
    event: LambdaEvent<ThumbnailRequest>,
    store: &S,
    config: &Config,
) -> Result<ThumbnailResponse, Error>
where
    S: ObjectStore + ?Sized,
{
    let request_id = event.context.request_id;
    let payload = event.payload;
    let is_batch = payload.is_batch();
    let objects = payload.into_objects();

    if is_batch && objects.is_empty() {
        tracing::warn!(request_id = %request_id, "No records found in S3 event");
        return Ok(ThumbnailResponse::Batch(Vec::new()));
    }

    let mut records = Vec::with_capacity(objects.len());
    for object in objects {
        let outcome = process_object(store, config, object).await.map_err(|e| {
            tracing::error!(request_id = %request_id, error = %e, "Lambda execution error");
            Error::from(e)
        })?;
        records.push(ThumbnailRecord::from(outcome));
    }

    if is_batch {
        return Ok(ThumbnailResponse::Batch(records));
    }
    records
        .pop()
        .map(ThumbnailResponse::Single)
        .ok_or_else(|| Error::from("No object key found in event"))
}
