use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::tracing;

use crate::error::ThumbnailError;

/// The object a notification refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEvent {
    pub bucket: String,
    pub key: String,
}

impl UploadEvent {
    /// Reads the first record of `event`. Notifications are configured to carry
    /// one object creation each; any further records are ignored.
    pub fn from_s3_event(event: &S3Event) -> Result<Self, ThumbnailError> {
        let record = event
            .records
            .first()
            .ok_or_else(|| ThumbnailError::MalformedEvent("No records found in S3 event".into()))?;
        if event.records.len() > 1 {
            tracing::warn!(
                "S3 event carries {} records, only the first is processed",
                event.records.len()
            );
        }

        let bucket = record
            .s3
            .bucket
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ThumbnailError::MalformedEvent("No bucket name found in S3 event".into()))?;
        let raw_key = record
            .s3
            .object
            .key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ThumbnailError::MalformedEvent("No object key found in S3 event".into()))?;

        Ok(Self {
            bucket: bucket.to_string(),
            key: decode_object_key(raw_key)?,
        })
    }
}

/// Object keys arrive form-encoded: `+` for spaces, `%XX` for everything else.
fn decode_object_key(raw: &str) -> Result<String, ThumbnailError> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(|key| key.into_owned())
        .map_err(|e| ThumbnailError::MalformedEvent(format!("Object key {raw:?} is not valid UTF-8: {e}")))
}
