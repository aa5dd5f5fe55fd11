use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, tracing, Error};
mod config;
mod error;
mod event_handler;
mod pipeline;
mod request;
mod storage;
mod thumbnail_key;
mod transform;
use config::Config;
use event_handler::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::subscriber::fmt().json().init();
    let config = Config::from_env()?;
    if config.bucket_name.is_none() {
        tracing::warn!(
            "{} is not set; only events naming a bucket can be processed",
            config::BUCKET_ENV
        );
    }
    tracing::info!(
        max_dimension = config.thumbnail.max_dimension(),
        quality = config.thumbnail.quality(),
        "Thumbnail generator configured"
    );
    let shared_config = aws_config::load_defaults(BehaviorVersion::v2025_01_17()).await;
    let s3_client = S3Client::new(&shared_config);
    run(service_fn(|event| function_handler(event, &s3_client, &config))).await
}
