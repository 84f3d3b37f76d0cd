//! Hotel creation orchestration.
//!
//! [`HotelCreationServiceImpl`] runs one submission through the pipeline:
//! authorise the caller, validate the listing, upload the image, persist the
//! record, then publish the creation event. Each step only runs when the
//! previous one succeeded. The stage reached is recorded on the
//! `hotel_creation` span.
//!
//! Failure policy:
//! - authorisation and validation failures stop the pipeline before any
//!   storage call;
//! - a failed record write leaves the uploaded image in place (logged with
//!   the orphaned key for external reconciliation);
//! - publishing is best-effort: failures are logged and the creation still
//!   succeeds.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use mockable::Clock;
use serde_json::json;
use tracing::{Instrument, Span, error, field, info, info_span, warn};

use super::ports::{
    AssetStore, AssetStoreError, Attachment, CreateHotelRequest, CreatedHotel, EventPublishError,
    EventPublisher, HotelCreationService, HotelFormFields, HotelRepository, HotelRepositoryError,
    TokenVerificationError, TokenVerifier,
};
use super::{
    ADMIN_GROUP, AssetKey, AuthorizationContext, AuthorizationError, CityName, Error, Hotel,
    HotelCreatedEvent, HotelDraft, HotelId, HotelName, HotelValidationError, OwnerId, Price,
    Rating, TokenClaims,
};

/// Pipeline position of a creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStage {
    /// Request accepted by the inbound adapter.
    Received,
    /// Form fields extracted.
    Parsed,
    /// Caller verified as an administrator.
    Authorized,
    /// Image written to the object store.
    AssetStored,
    /// Listing record written.
    RecordPersisted,
    /// Creation event handed to the topic (or abandoned).
    EventPublished,
    /// Response ready.
    Responded,
    /// The pipeline stopped with an error.
    Errored,
}

impl CreationStage {
    /// Stable label used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Parsed => "parsed",
            Self::Authorized => "authorized",
            Self::AssetStored => "asset_stored",
            Self::RecordPersisted => "record_persisted",
            Self::EventPublished => "event_published",
            Self::Responded => "responded",
            Self::Errored => "errored",
        }
    }
}

/// Runtime parameters for the creation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelCreationConfig {
    /// Topic that receives creation events.
    pub topic: String,
    /// Upper bound for each collaborator call.
    pub call_timeout: Duration,
}

impl HotelCreationConfig {
    /// Default per-call budget.
    pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_millis(5_000);

    /// Build a configuration for `topic` with the default call budget.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            call_timeout: Self::DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Override the per-call budget.
    #[must_use]
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }
}

enum CallFailure<E> {
    TimedOut,
    Failed(E),
}

async fn bounded<T, E>(
    budget: Duration,
    call: impl Future<Output = Result<T, E>>,
) -> Result<T, CallFailure<E>> {
    match tokio::time::timeout(budget, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(CallFailure::Failed(err)),
        Err(_) => Err(CallFailure::TimedOut),
    }
}

/// Domain service implementing [`HotelCreationService`].
#[derive(Clone)]
pub struct HotelCreationServiceImpl<A, R, P> {
    assets: Arc<A>,
    hotels: Arc<R>,
    events: Arc<P>,
    verifier: Arc<dyn TokenVerifier>,
    clock: Arc<dyn Clock>,
    config: HotelCreationConfig,
}

impl<A, R, P> HotelCreationServiceImpl<A, R, P> {
    /// Create the service from its collaborators.
    pub fn new(
        assets: Arc<A>,
        hotels: Arc<R>,
        events: Arc<P>,
        verifier: Arc<dyn TokenVerifier>,
        clock: Arc<dyn Clock>,
        config: HotelCreationConfig,
    ) -> Self {
        Self {
            assets,
            hotels,
            events,
            verifier,
            clock,
            config,
        }
    }
}

impl<A, R, P> HotelCreationServiceImpl<A, R, P>
where
    A: AssetStore,
    R: HotelRepository,
    P: EventPublisher,
{
    async fn authorise(
        &self,
        id_token: Option<&str>,
        submitted_user: Option<&str>,
    ) -> Result<AuthorizationContext, Error> {
        let token = id_token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::unauthorized("idToken is required"))?;

        bounded(self.config.call_timeout, self.verifier.verify(token))
            .await
            .map_err(map_verification_failure)?;

        let claims = TokenClaims::decode(token).map_err(|err| {
            warn!(error = %err, "rejected undecodable token");
            Error::unauthorized("idToken could not be decoded")
        })?;
        let context = AuthorizationContext::from_claims(claims).map_err(map_authorization_error)?;
        context
            .require_group(ADMIN_GROUP)
            .map_err(map_authorization_error)?;
        if let Some(user_id) = submitted_user {
            context
                .require_subject(user_id)
                .map_err(map_authorization_error)?;
        }
        Ok(context)
    }

    async fn store_asset(&self, key: &AssetKey, data: Bytes) -> Result<(), Error> {
        let reference = bounded(self.config.call_timeout, self.assets.put(key, data))
            .await
            .map_err(map_asset_failure)?;
        info!(
            asset_key = %reference.key,
            container = %reference.container,
            version = reference.version.as_deref().unwrap_or(""),
            "stored hotel image"
        );
        Ok(())
    }

    async fn persist(&self, hotel: &Hotel) -> Result<(), Error> {
        bounded(self.config.call_timeout, self.hotels.save(hotel))
            .await
            .map_err(|failure| {
                warn!(
                    orphaned_asset = %hotel.file_name(),
                    hotel_id = %hotel.id(),
                    "hotel image stored without a record; left for reconciliation"
                );
                map_repository_failure(failure)
            })
    }

    async fn publish(&self, hotel: &Hotel) -> bool {
        let event = HotelCreatedEvent::new(hotel, self.clock.utc());
        let payload = match serde_json::to_string(&event) {
            Ok(payload) => payload,
            Err(err) => {
                error!(error = %err, hotel_id = %hotel.id(), "failed to serialise creation event");
                return false;
            }
        };
        match bounded(
            self.config.call_timeout,
            self.events.publish(&self.config.topic, &payload),
        )
        .await
        {
            Ok(()) => true,
            Err(failure) => {
                log_publish_failure(&failure, hotel.id(), &self.config.topic);
                false
            }
        }
    }

    async fn run(&self, request: CreateHotelRequest, span: &Span) -> Result<CreatedHotel, Error> {
        let CreateHotelRequest {
            fields,
            id_token,
            attachment,
        } = request;
        enter_stage(span, CreationStage::Parsed);

        let context = self
            .authorise(id_token.as_deref(), fields.user_id.as_deref())
            .await?;
        enter_stage(span, CreationStage::Authorized);

        let (draft, data) = validate(fields, attachment, &context)?;

        self.store_asset(&draft.file_name, data).await?;
        enter_stage(span, CreationStage::AssetStored);

        let hotel = Hotel::from_draft(HotelId::random(), draft);
        span.record("hotel_id", field::display(hotel.id()));
        self.persist(&hotel).await?;
        enter_stage(span, CreationStage::RecordPersisted);

        let event_published = self.publish(&hotel).await;
        enter_stage(span, CreationStage::EventPublished);

        info!(
            hotel_id = %hotel.id(),
            owner = %hotel.owner(),
            event_published,
            "hotel created"
        );
        Ok(CreatedHotel {
            hotel,
            event_published,
        })
    }
}

#[async_trait]
impl<A, R, P> HotelCreationService for HotelCreationServiceImpl<A, R, P>
where
    A: AssetStore,
    R: HotelRepository,
    P: EventPublisher,
{
    async fn create(&self, request: CreateHotelRequest) -> Result<CreatedHotel, Error> {
        let span = info_span!(
            "hotel_creation",
            stage = CreationStage::Received.as_str(),
            hotel_id = field::Empty,
        );
        let result = self.run(request, &span).instrument(span.clone()).await;
        match &result {
            Ok(_) => enter_stage(&span, CreationStage::Responded),
            Err(err) => {
                enter_stage(&span, CreationStage::Errored);
                span.in_scope(|| {
                    info!(code = ?err.code(), message = err.message(), "hotel creation failed");
                });
            }
        }
        result
    }
}

fn enter_stage(span: &Span, stage: CreationStage) {
    span.record("stage", stage.as_str());
}

fn required(field: &'static str, value: Option<String>) -> Result<String, Error> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            Error::invalid_request(format!("{field} is required"))
                .with_details(json!({ "field": field }))
        })
}

fn invalid_field(err: HotelValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}

fn validate(
    fields: HotelFormFields,
    attachment: Option<Attachment>,
    context: &AuthorizationContext,
) -> Result<(HotelDraft, Bytes), Error> {
    let HotelFormFields {
        name,
        city,
        rating,
        price,
        user_id: _,
    } = fields;

    let attachment = attachment.ok_or_else(|| {
        Error::invalid_request("a file attachment is required")
            .with_details(json!({ "field": "file" }))
    })?;

    let draft = HotelDraft {
        name: HotelName::new(required("hotelName", name)?).map_err(invalid_field)?,
        city: CityName::new(required("hotelCity", city)?).map_err(invalid_field)?,
        rating: Rating::parse(&required("hotelRating", rating)?).map_err(invalid_field)?,
        price: Price::parse(&required("hotelPrice", price)?).map_err(invalid_field)?,
        owner: OwnerId::new(context.subject()).map_err(invalid_field)?,
        file_name: AssetKey::new(attachment.file_name).map_err(invalid_field)?,
    };
    Ok((draft, attachment.data))
}

fn map_verification_failure(failure: CallFailure<TokenVerificationError>) -> Error {
    match failure {
        CallFailure::TimedOut => Error::gateway_timeout("token verification timed out"),
        CallFailure::Failed(err) => {
            warn!(error = %err, error_kind = err.kind(), "token verification failed");
            Error::unauthorized("idToken failed verification")
        }
    }
}

fn map_authorization_error(err: AuthorizationError) -> Error {
    warn!(error = %err, "hotel creation not authorised");
    let message = match err {
        AuthorizationError::MissingSubject => "idToken has no subject",
        AuthorizationError::MissingGroup { .. } => "caller is not an administrator",
        AuthorizationError::SubjectMismatch => "userId does not match the authenticated caller",
    };
    Error::unauthorized(message)
}

fn map_asset_failure(failure: CallFailure<AssetStoreError>) -> Error {
    match failure {
        CallFailure::TimedOut => {
            error!("object store call timed out");
            Error::gateway_timeout("timed out storing the hotel image")
        }
        CallFailure::Failed(err) => {
            error!(error = %err, error_kind = err.kind(), "object store write failed");
            Error::bad_gateway("failed to store the hotel image")
        }
    }
}

fn map_repository_failure(failure: CallFailure<HotelRepositoryError>) -> Error {
    match failure {
        CallFailure::TimedOut => {
            error!("record store call timed out");
            Error::gateway_timeout("timed out saving the hotel")
        }
        CallFailure::Failed(err) => {
            error!(error = %err, error_kind = err.kind(), "record store write failed");
            Error::bad_gateway("failed to save the hotel")
        }
    }
}

fn log_publish_failure(failure: &CallFailure<EventPublishError>, hotel_id: HotelId, topic: &str) {
    match failure {
        CallFailure::TimedOut => {
            error!(%hotel_id, topic, "creation event publish timed out; event dropped");
        }
        CallFailure::Failed(err) => {
            error!(
                %hotel_id,
                topic,
                error = %err,
                error_kind = err.kind(),
                "creation event publish failed; event dropped"
            );
        }
    }
}

#[cfg(test)]
mod tests;
