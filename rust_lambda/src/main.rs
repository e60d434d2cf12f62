use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, tracing, Error};
mod config;
mod error;
mod event_handler;
mod store;
mod thumbnail;
mod thumbnail_key;
mod upload_event;
#[cfg(test)]
mod test_support;
use config::HandlerConfig;
use event_handler::function_handler;
use store::S3ObjectStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::subscriber::fmt().json().init();
    let config = HandlerConfig::from_env()?;
    tracing::info!("Thumbnails will be written to bucket {}", config.dest_bucket);
    let shared_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let store = S3ObjectStore::new(S3Client::new(&shared_config));
    run(service_fn(|event| function_handler(event, &store, &config))).await
}
