//! Event emitted after a hotel record has been persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AssetKey, CityName, Hotel, HotelId, HotelName, OwnerId, Price, Rating};

/// Projection of a persisted hotel, stamped when it is published.
///
/// The event has no identity of its own and is never retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelCreatedEvent {
    id: HotelId,
    name: HotelName,
    city_name: CityName,
    rating: Rating,
    price: Price,
    user_id: OwnerId,
    file_name: AssetKey,
    created_at: DateTime<Utc>,
}

impl HotelCreatedEvent {
    /// Project `hotel` into an event stamped with `created_at`.
    #[must_use]
    pub fn new(hotel: &Hotel, created_at: DateTime<Utc>) -> Self {
        Self {
            id: hotel.id(),
            name: hotel.name().clone(),
            city_name: hotel.city().clone(),
            rating: hotel.rating(),
            price: hotel.price(),
            user_id: hotel.owner().clone(),
            file_name: hotel.file_name().clone(),
            created_at,
        }
    }

    /// Identifier of the hotel the event describes.
    #[must_use]
    pub fn hotel_id(&self) -> HotelId {
        self.id
    }

    /// Publication timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
