//! AWS SDK adapters: S3 for images, DynamoDB for records, SNS for events.
//!
//! Compiled only with the `aws` feature. Credentials come from the standard
//! provider chain (environment, profile, instance or task role).

mod dynamodb_hotel_repository;
mod s3_asset_store;
mod sns_event_publisher;

pub use dynamodb_hotel_repository::DynamoDbHotelRepository;
pub use s3_asset_store::S3AssetStore;
pub use sns_event_publisher::SnsEventPublisher;

/// Load shared SDK configuration, optionally pinned to `region`.
pub async fn load_sdk_config(region: Option<&str>) -> aws_config::SdkConfig {
    let mut loader = aws_config::from_env();
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region.to_owned()));
    }
    loader.load().await
}
