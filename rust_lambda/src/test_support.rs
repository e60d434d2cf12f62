use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

use async_trait::async_trait;
use aws_lambda_events::event::s3::{S3Bucket, S3Entity, S3Event, S3EventRecord, S3Object};
use image::{DynamicImage, ImageFormat};

use crate::error::{FetchError, StoreError};
use crate::store::{ObjectStore, PutReceipt};

pub(crate) fn s3_event(bucket: &str, key: &str) -> S3Event {
    let record = S3EventRecord {
        event_name: Some("ObjectCreated:Put".to_string()),
        s3: S3Entity {
            bucket: S3Bucket {
                name: Some(bucket.to_string()),
                ..Default::default()
            },
            object: S3Object {
                key: Some(key.to_string()),
                size: Some(1234),
                ..Default::default()
            },
            schema_version: Some("1.0".to_string()),
            configuration_id: Some("thumbnail-trigger".to_string()),
        },
        ..Default::default()
    };
    S3Event {
        records: vec![record],
    }
}

pub(crate) fn encode_png(image: &DynamicImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("PNG encoding of a test image");
    buffer.into_inner()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PutCall {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Store double that keeps objects in memory and records every call.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    gets: Mutex<Vec<(String, String)>>,
    puts: Mutex<Vec<PutCall>>,
    withhold_receipt: bool,
}

impl InMemoryStore {
    pub fn with_object(self, bucket: &str, key: &str, body: Vec<u8>) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body);
        self
    }

    /// Accepts writes but answers without an entity tag.
    pub fn withholding_receipts(mut self) -> Self {
        self.withhold_receipt = true;
        self
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn get_count(&self) -> usize {
        self.gets.lock().unwrap().len()
    }

    pub fn puts(&self) -> Vec<PutCall> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, FetchError> {
        self.gets
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));
        self.object(bucket, key).ok_or_else(|| FetchError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<PutReceipt, StoreError> {
        self.puts.lock().unwrap().push(PutCall {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
            body: body.clone(),
        });
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body);
        let e_tag = (!self.withhold_receipt).then(|| format!("\"etag-{}\"", self.puts.lock().unwrap().len()));
        Ok(PutReceipt { e_tag })
    }
}
