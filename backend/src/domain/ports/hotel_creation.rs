//! Driving port for the hotel creation pipeline.
//!
//! Inbound adapters translate a transport request into a
//! [`CreateHotelRequest`] and hand it to [`HotelCreationService`]. Field values
//! arrive unvalidated; the service owns authorisation and validation so every
//! adapter gets the same ordering guarantees.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{Error, Hotel};

/// Uploaded file carried by a creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name supplied by the client; becomes the object key.
    pub file_name: String,
    /// Declared content type, if the client sent one.
    pub content_type: Option<String>,
    /// Fully buffered file contents.
    pub data: Bytes,
}

/// Raw text fields of a hotel submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotelFormFields {
    /// `hotelName` field.
    pub name: Option<String>,
    /// `hotelCity` field.
    pub city: Option<String>,
    /// `hotelRating` field.
    pub rating: Option<String>,
    /// `hotelPrice` field.
    pub price: Option<String>,
    /// `userId` field; must match the token subject.
    pub user_id: Option<String>,
}

/// Input to [`HotelCreationService::create`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateHotelRequest {
    /// Listing fields.
    pub fields: HotelFormFields,
    /// Bearer token submitted in the `idToken` field.
    pub id_token: Option<String>,
    /// First file part of the submission.
    pub attachment: Option<Attachment>,
}

/// Result of a successful creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedHotel {
    /// The persisted record.
    pub hotel: Hotel,
    /// Whether the creation event reached the topic.
    pub event_published: bool,
}

/// Driving port for hotel creation.
///
/// # Errors
///
/// Returns [`Error`] with:
/// - `Unauthorized` when the token is missing, invalid, or lacks the `Admin` group.
/// - `InvalidRequest` when a field or the attachment is missing or invalid.
/// - `BadGateway` when the object store or record store fails.
/// - `GatewayTimeout` when either store exceeds the call budget.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HotelCreationService: Send + Sync {
    /// Run the creation pipeline for one submission.
    async fn create(&self, request: CreateHotelRequest) -> Result<CreatedHotel, Error>;
}
