use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

use crate::error::{FetchError, StoreError};

/// What the store reports back for a successful write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutReceipt {
    pub e_tag: Option<String>,
}

impl PutReceipt {
    /// A write only counts once the store has tagged the new object.
    pub fn is_acknowledged(&self) -> bool {
        self.e_tag.as_deref().is_some_and(|tag| !tag.is_empty())
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, FetchError>;

    /// Writes `body` as a single object; readers never observe a partial body.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<PutReceipt, StoreError>;
}

pub struct S3ObjectStore {
    client: S3Client,
}

impl S3ObjectStore {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, FetchError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let code = match e.as_service_error() {
                    Some(service_err) if service_err.is_no_such_key() => Some("NoSuchKey"),
                    _ => e.code(),
                };
                let status = e.raw_response().map(|raw| raw.status().as_u16());
                classify_fetch_failure(bucket, key, code, status, DisplayErrorContext(&e).to_string())
            })?;

        let body = output.body.collect().await.map_err(|e| FetchError::Other {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: format!("failed to read object body: {e}"),
        })?;
        Ok(body.into_bytes().to_vec())
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<PutReceipt, StoreError> {
        let output = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StoreError::Rejected {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(PutReceipt {
            e_tag: output.e_tag().map(str::to_owned),
        })
    }
}

fn classify_fetch_failure(
    bucket: &str,
    key: &str,
    code: Option<&str>,
    status: Option<u16>,
    message: String,
) -> FetchError {
    let (bucket, key) = (bucket.to_string(), key.to_string());
    match (code, status) {
        (Some("NoSuchKey" | "NotFound"), _) | (_, Some(404)) => FetchError::NotFound { bucket, key },
        (Some("AccessDenied"), _) | (_, Some(403)) => FetchError::AccessDenied { bucket, key },
        _ => FetchError::Other {
            bucket,
            key,
            message,
        },
    }
}
