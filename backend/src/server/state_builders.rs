//! Builders wiring adapters into the creation service.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use hotel_admin::domain::ports::{GatewayVerified, HotelCreationService, TokenVerifier};
use hotel_admin::domain::{HotelCreationConfig, HotelCreationServiceImpl};
use hotel_admin::outbound::token::Hs256TokenVerifier;
use hotel_admin::settings::{TokenTrust, ValidatedSettings};

/// Pick the token verifier for the configured trust boundary.
///
/// Logged once so operators can see which component vouches for tokens.
pub fn build_verifier(trust: &TokenTrust, clock: Arc<dyn Clock>) -> Arc<dyn TokenVerifier> {
    match trust {
        TokenTrust::Gateway => {
            warn!(
                token_trust = trust.as_str(),
                "token signatures are not checked here; an upstream authoriser must verify them"
            );
            Arc::new(GatewayVerified)
        }
        TokenTrust::Verify { secret } => {
            info!(token_trust = trust.as_str(), "verifying HS256 token signatures in-process");
            Arc::new(Hs256TokenVerifier::new(secret.clone(), clock))
        }
    }
}

fn creation_config(settings: &ValidatedSettings) -> HotelCreationConfig {
    HotelCreationConfig::new(settings.topic.clone()).with_call_timeout(settings.call_timeout)
}

/// Build the creation service against S3, DynamoDB and SNS.
///
/// Each client is pinned to its resource's region; the SNS region comes from
/// the topic ARN.
#[cfg(feature = "aws")]
pub async fn build_hotel_service(settings: &ValidatedSettings) -> Arc<dyn HotelCreationService> {
    use hotel_admin::outbound::aws::{
        DynamoDbHotelRepository, S3AssetStore, SnsEventPublisher, load_sdk_config,
    };

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let verifier = build_verifier(&settings.token_trust, clock.clone());
    let bucket_config = load_sdk_config(settings.bucket_region.as_deref()).await;
    let table_config = load_sdk_config(settings.table_region.as_deref()).await;
    let topic_config = load_sdk_config(settings.topic_region.as_deref()).await;
    info!(
        bucket = %settings.bucket_name,
        table = %settings.table_name,
        topic = %settings.topic,
        "using AWS adapters"
    );

    Arc::new(HotelCreationServiceImpl::new(
        Arc::new(S3AssetStore::new(
            aws_sdk_s3::Client::new(&bucket_config),
            settings.bucket_name.clone(),
        )),
        Arc::new(DynamoDbHotelRepository::new(
            aws_sdk_dynamodb::Client::new(&table_config),
            settings.table_name.clone(),
        )),
        Arc::new(SnsEventPublisher::new(aws_sdk_sns::Client::new(
            &topic_config,
        ))),
        verifier,
        clock,
        creation_config(settings),
    ))
}

/// Build the creation service against process-local stores.
///
/// Selected by building with `--no-default-features`.
#[cfg(not(feature = "aws"))]
pub async fn build_hotel_service(settings: &ValidatedSettings) -> Arc<dyn HotelCreationService> {
    use hotel_admin::outbound::memory::{
        InMemoryAssetStore, InMemoryEventPublisher, InMemoryHotelRepository,
    };

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let verifier = build_verifier(&settings.token_trust, clock.clone());
    warn!("using in-memory adapters; records are lost on restart");

    Arc::new(HotelCreationServiceImpl::new(
        Arc::new(InMemoryAssetStore::new(settings.bucket_name.clone())),
        Arc::new(InMemoryHotelRepository::new()),
        Arc::new(InMemoryEventPublisher::new()),
        verifier,
        clock,
        creation_config(settings),
    ))
}
