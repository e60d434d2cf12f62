use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{tracing, Error, LambdaEvent};

use crate::config::HandlerConfig;
use crate::error::{StoreError, ThumbnailError};
use crate::store::ObjectStore;
use crate::thumbnail::{render_thumbnail, THUMBNAIL_CONTENT_TYPE};
use crate::thumbnail_key::derive_thumbnail_key;
use crate::upload_event::UploadEvent;

#[derive(Debug)]
struct StoredThumbnail {
    bucket: String,
    key: String,
    size: usize,
}

async fn create_thumbnail<S: ObjectStore>(
    event: &S3Event,
    store: &S,
    config: &HandlerConfig,
) -> Result<StoredThumbnail, ThumbnailError> {
    let upload = UploadEvent::from_s3_event(event)?;
    let thumbnail_key = derive_thumbnail_key(&upload.key);
    tracing::info!(
        "Bucket name: {}, file name: {}, thumbnail bucket name: {}, file name: {}",
        upload.bucket,
        upload.key,
        config.dest_bucket,
        thumbnail_key
    );

    let original = store.get(&upload.bucket, &upload.key).await?;
    tracing::info!("Fetched {} bytes from {}/{}", original.len(), upload.bucket, upload.key);

    let thumbnail = render_thumbnail(&original)?;
    tracing::info!(
        format = ?thumbnail.source_format,
        "Size before compression: {}x{}, after: {}x{}",
        thumbnail.original.0,
        thumbnail.original.1,
        thumbnail.resized.0,
        thumbnail.resized.1
    );

    let size = thumbnail.bytes.len();
    let receipt = store
        .put(
            &config.dest_bucket,
            &thumbnail_key,
            thumbnail.bytes,
            THUMBNAIL_CONTENT_TYPE,
        )
        .await?;
    if !receipt.is_acknowledged() {
        return Err(StoreError::Unacknowledged {
            bucket: config.dest_bucket.clone(),
            key: thumbnail_key,
        }
        .into());
    }

    Ok(StoredThumbnail {
        bucket: config.dest_bucket.clone(),
        key: thumbnail_key,
        size,
    })
}

/// Handles one upload notification and hands the event back unchanged on success.
pub(crate) async fn function_handler<S: ObjectStore>(
    event: LambdaEvent<S3Event>,
    store: &S,
    config: &HandlerConfig,
) -> Result<S3Event, Error> {
    let payload = event.payload;
    tracing::info!(
        request_id = %event.context.request_id,
        "Received S3 event with {} record(s)",
        payload.records.len()
    );

    match create_thumbnail(&payload, store, config).await {
        Ok(stored) => {
            tracing::info!(
                "Uploaded {} byte thumbnail to {}/{}",
                stored.size,
                stored.bucket,
                stored.key
            );
            Ok(payload)
        }
        Err(err) => {
            tracing::error!(request_id = %event.context.request_id, "Thumbnail generation failed: {}", err);
            Err(err.into())
        }
    }
}
