//! Domain primitives, services, and ports.
//!
//! Purpose: define the strongly typed hotel listing model and the creation
//! pipeline that drives it. Transport and storage details live in the
//! inbound and outbound adapters.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport agnostic failure payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Hotel and its value objects: validated listing record.
//! - HotelCreationServiceImpl: the creation pipeline.
//! - TraceId: request correlation identifier.

pub mod error;
pub mod hotel;
pub mod hotel_creation;
pub mod hotel_events;
pub mod ports;
pub mod token_claims;
pub mod trace_id;

pub use self::error::{Error, ErrorCode};
pub use self::hotel::{
    AssetKey, CityName, Hotel, HotelDraft, HotelId, HotelName, HotelValidationError, OwnerId,
    Price, Rating,
};
pub use self::hotel_creation::{CreationStage, HotelCreationConfig, HotelCreationServiceImpl};
pub use self::hotel_events::HotelCreatedEvent;
pub use self::token_claims::{
    ADMIN_GROUP, AuthorizationContext, AuthorizationError, TokenClaims, TokenDecodeError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient result alias for adapters.
///
/// # Examples
/// ```
/// use hotel_admin::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::unauthorized("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
