//! Unit tests for the hotel creation pipeline.
//!
//! Collaborators are mockall doubles so each test states exactly which
//! storage calls may happen.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use mockable::{Clock, MockClock};
use rstest::{fixture, rstest};
use serde_json::Value;

use super::{HotelCreationConfig, HotelCreationServiceImpl};
use crate::domain::ports::{
    AssetReference, AssetStore, AssetStoreError, Attachment, CreateHotelRequest,
    EventPublishError, GatewayVerified, HotelCreationService, HotelFormFields,
    HotelRepositoryError, MockAssetStore, MockEventPublisher, MockHotelRepository,
    MockTokenVerifier, TokenVerificationError, TokenVerifier,
};
use crate::domain::{AssetKey, ErrorCode};

const TOPIC: &str = "arn:aws:sns:eu-west-1:000000000000:hotel-created";
const OWNER: &str = "user-123";

type Service = HotelCreationServiceImpl<MockAssetStore, MockHotelRepository, MockEventPublisher>;

fn token(payload: &str) -> String {
    format!("e30.{}.c2ln", URL_SAFE_NO_PAD.encode(payload))
}

fn admin_token() -> String {
    token(&format!(r#"{{"sub":"{OWNER}","cognito:groups":["Admin"]}}"#))
}

fn published_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 15, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn fixture_clock() -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(published_at());
    Arc::new(clock)
}

#[fixture]
fn request() -> CreateHotelRequest {
    CreateHotelRequest {
        fields: HotelFormFields {
            name: Some("Grand".to_owned()),
            city: Some("Paris".to_owned()),
            rating: Some("4".to_owned()),
            price: Some("200".to_owned()),
            user_id: Some(OWNER.to_owned()),
        },
        id_token: Some(admin_token()),
        attachment: Some(Attachment {
            file_name: "grand.jpg".to_owned(),
            content_type: Some("image/jpeg".to_owned()),
            data: Bytes::from_static(b"\xff\xd8\xff"),
        }),
    }
}

fn reference(key: &AssetKey) -> AssetReference {
    AssetReference {
        container: "hotel-images".to_owned(),
        key: key.clone(),
        version: None,
    }
}

fn make_service(
    assets: MockAssetStore,
    hotels: MockHotelRepository,
    events: MockEventPublisher,
) -> Service {
    make_service_with_verifier(assets, hotels, events, Arc::new(GatewayVerified))
}

fn make_service_with_verifier(
    assets: MockAssetStore,
    hotels: MockHotelRepository,
    events: MockEventPublisher,
    verifier: Arc<dyn TokenVerifier>,
) -> Service {
    HotelCreationServiceImpl::new(
        Arc::new(assets),
        Arc::new(hotels),
        Arc::new(events),
        verifier,
        fixture_clock(),
        HotelCreationConfig::new(TOPIC),
    )
}

fn untouched_collaborators() -> (MockAssetStore, MockHotelRepository, MockEventPublisher) {
    let mut assets = MockAssetStore::new();
    assets.expect_put().never();
    let mut hotels = MockHotelRepository::new();
    hotels.expect_save().never();
    let mut events = MockEventPublisher::new();
    events.expect_publish().never();
    (assets, hotels, events)
}

fn accepting_assets() -> MockAssetStore {
    let mut assets = MockAssetStore::new();
    assets
        .expect_put()
        .withf(|key, data| key.as_ref() == "grand.jpg" && data.len() == 3)
        .times(1)
        .returning(|key, _| Ok(reference(key)));
    assets
}

#[rstest]
#[tokio::test]
async fn creates_hotel_and_publishes_event(request: CreateHotelRequest) {
    let mut hotels = MockHotelRepository::new();
    hotels
        .expect_save()
        .withf(|hotel| hotel.owner().as_ref() == OWNER && hotel.rating().value() == 4)
        .times(1)
        .returning(|_| Ok(()));
    let mut events = MockEventPublisher::new();
    events
        .expect_publish()
        .withf(|topic, payload| {
            let value: Value = serde_json::from_str(payload).expect("event is JSON");
            topic == TOPIC
                && value["createdAt"] == "2026-05-04T09:15:00Z"
                && value["fileName"] == "grand.jpg"
                && value["userId"] == OWNER
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let service = make_service(accepting_assets(), hotels, events);
    let created = service.create(request).await.expect("creation succeeds");

    assert!(created.event_published);
    assert_eq!(created.hotel.owner().as_ref(), OWNER);
    assert_eq!(created.hotel.price().value(), 200);
    assert_eq!(created.hotel.file_name().as_ref(), "grand.jpg");
}

#[rstest]
#[case(r#"{"sub":"user-123","cognito:groups":["Editors"]}"#)]
#[case(r#"{"sub":"user-123","cognito:groups":"admin"}"#)]
#[case(r#"{"sub":"user-123"}"#)]
#[tokio::test]
async fn non_admin_callers_stop_before_any_storage_call(
    mut request: CreateHotelRequest,
    #[case] payload: &str,
) {
    request.id_token = Some(token(payload));
    let (assets, hotels, events) = untouched_collaborators();
    let service = make_service(assets, hotels, events);

    let err = service.create(request).await.expect_err("must be rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[case(None)]
#[case(Some("   "))]
#[case(Some("not-a-token"))]
#[tokio::test]
async fn missing_or_undecodable_tokens_are_unauthorised(
    mut request: CreateHotelRequest,
    #[case] id_token: Option<&str>,
) {
    request.id_token = id_token.map(str::to_owned);
    let (assets, hotels, events) = untouched_collaborators();
    let service = make_service(assets, hotels, events);

    let err = service.create(request).await.expect_err("must be rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn verifier_rejection_is_unauthorised(request: CreateHotelRequest) {
    let mut verifier = MockTokenVerifier::new();
    verifier
        .expect_verify()
        .times(1)
        .returning(|_| Err(TokenVerificationError::bad_signature()));
    let (assets, hotels, events) = untouched_collaborators();
    let service = make_service_with_verifier(assets, hotels, events, Arc::new(verifier));

    let err = service.create(request).await.expect_err("must be rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "idToken failed verification");
}

#[rstest]
#[tokio::test]
async fn submitted_user_must_match_token_subject(mut request: CreateHotelRequest) {
    request.fields.user_id = Some("someone-else".to_owned());
    let (assets, hotels, events) = untouched_collaborators();
    let service = make_service(assets, hotels, events);

    let err = service.create(request).await.expect_err("must be rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn owner_defaults_to_token_subject_when_user_id_is_omitted(
    mut request: CreateHotelRequest,
) {
    request.fields.user_id = None;
    let mut hotels = MockHotelRepository::new();
    hotels.expect_save().times(1).returning(|_| Ok(()));
    let mut events = MockEventPublisher::new();
    events.expect_publish().times(1).returning(|_, _| Ok(()));
    let service = make_service(accepting_assets(), hotels, events);

    let created = service.create(request).await.expect("creation succeeds");

    assert_eq!(created.hotel.owner().as_ref(), OWNER);
}

#[rstest]
#[case::rating_text("hotelRating", "four")]
#[case::rating_out_of_range("hotelRating", "9")]
#[case::price_text("hotelPrice", "cheap")]
#[case::price_negative("hotelPrice", "-10")]
#[tokio::test]
async fn invalid_numbers_fail_before_storage(
    mut request: CreateHotelRequest,
    #[case] field: &str,
    #[case] value: &str,
) {
    match field {
        "hotelRating" => request.fields.rating = Some(value.to_owned()),
        _ => request.fields.price = Some(value.to_owned()),
    }
    let (assets, hotels, events) = untouched_collaborators();
    let service = make_service(assets, hotels, events);

    let err = service.create(request).await.expect_err("must be rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|details| details["field"].as_str()),
        Some(field)
    );
}

#[rstest]
#[tokio::test]
async fn missing_field_is_reported_by_name(mut request: CreateHotelRequest) {
    request.fields.city = None;
    let (assets, hotels, events) = untouched_collaborators();
    let service = make_service(assets, hotels, events);

    let err = service.create(request).await.expect_err("must be rejected");

    assert_eq!(err.message(), "hotelCity is required");
}

#[rstest]
#[tokio::test]
async fn missing_attachment_fails_without_storage_calls(mut request: CreateHotelRequest) {
    request.attachment = None;
    let (assets, hotels, events) = untouched_collaborators();
    let service = make_service(assets, hotels, events);

    let err = service.create(request).await.expect_err("must be rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn path_like_file_names_are_rejected(mut request: CreateHotelRequest) {
    if let Some(attachment) = request.attachment.as_mut() {
        attachment.file_name = "../escape.jpg".to_owned();
    }
    let (assets, hotels, events) = untouched_collaborators();
    let service = make_service(assets, hotels, events);

    let err = service.create(request).await.expect_err("must be rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn asset_failure_creates_no_record(request: CreateHotelRequest) {
    let mut assets = MockAssetStore::new();
    assets
        .expect_put()
        .times(1)
        .returning(|_, _| Err(AssetStoreError::rejected("AccessDenied")));
    let (_, hotels, events) = untouched_collaborators();
    let service = make_service(assets, hotels, events);

    let err = service.create(request).await.expect_err("must fail");

    assert_eq!(err.code(), ErrorCode::BadGateway);
    assert!(!err.message().contains("AccessDenied"));
}

#[rstest]
#[tokio::test]
async fn persistence_failure_orphans_the_uploaded_asset(request: CreateHotelRequest) {
    let mut hotels = MockHotelRepository::new();
    hotels
        .expect_save()
        .times(1)
        .returning(|_| Err(HotelRepositoryError::query("throttled")));
    let mut events = MockEventPublisher::new();
    events.expect_publish().never();
    // The upload happens exactly once and is not rolled back.
    let service = make_service(accepting_assets(), hotels, events);

    let err = service.create(request).await.expect_err("must fail");

    assert_eq!(err.code(), ErrorCode::BadGateway);
}

#[rstest]
#[tokio::test]
async fn publish_failure_still_succeeds(request: CreateHotelRequest) {
    let mut hotels = MockHotelRepository::new();
    hotels.expect_save().times(1).returning(|_| Ok(()));
    let mut events = MockEventPublisher::new();
    events
        .expect_publish()
        .times(1)
        .returning(|_, _| Err(EventPublishError::unavailable("topic deleted")));
    let service = make_service(accepting_assets(), hotels, events);

    let created = service.create(request).await.expect("best-effort publish");

    assert!(!created.event_published);
}

#[rstest]
#[tokio::test]
async fn repeated_submissions_create_distinct_records(request: CreateHotelRequest) {
    let mut assets = MockAssetStore::new();
    assets
        .expect_put()
        .times(2)
        .returning(|key, _| Ok(reference(key)));
    let mut hotels = MockHotelRepository::new();
    hotels.expect_save().times(2).returning(|_| Ok(()));
    let mut events = MockEventPublisher::new();
    events.expect_publish().times(2).returning(|_, _| Ok(()));
    let service = make_service(assets, hotels, events);

    let first = service.create(request.clone()).await.expect("first");
    let second = service.create(request).await.expect("second");

    assert_ne!(first.hotel.id(), second.hotel.id());
}

struct StalledAssetStore;

#[async_trait]
impl AssetStore for StalledAssetStore {
    async fn put(&self, key: &AssetKey, _data: Bytes) -> Result<AssetReference, AssetStoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(reference(key))
    }
}

#[rstest]
#[tokio::test]
async fn stalled_upload_times_out(request: CreateHotelRequest) {
    let (_, hotels, events) = untouched_collaborators();
    let service = HotelCreationServiceImpl::new(
        Arc::new(StalledAssetStore),
        Arc::new(hotels),
        Arc::new(events),
        Arc::new(GatewayVerified),
        fixture_clock(),
        HotelCreationConfig::new(TOPIC).with_call_timeout(Duration::from_millis(20)),
    );

    let err = service.create(request).await.expect_err("must time out");

    assert_eq!(err.code(), ErrorCode::GatewayTimeout);
}
