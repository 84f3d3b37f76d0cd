//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`AssetStore`, `HotelRepository`, `EventPublisher`,
//! `TokenVerifier`) are implemented by outbound adapters. The driving port
//! (`HotelCreationService`) is consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod asset_store;
mod event_publisher;
mod hotel_creation;
mod hotel_repository;
mod token_verifier;

#[cfg(test)]
pub use asset_store::MockAssetStore;
pub use asset_store::{AssetReference, AssetStore, AssetStoreError};
#[cfg(test)]
pub use event_publisher::MockEventPublisher;
pub use event_publisher::{EventPublishError, EventPublisher};
#[cfg(test)]
pub use hotel_creation::MockHotelCreationService;
pub use hotel_creation::{
    Attachment, CreateHotelRequest, CreatedHotel, HotelCreationService, HotelFormFields,
};
#[cfg(test)]
pub use hotel_repository::MockHotelRepository;
pub use hotel_repository::{HotelRepository, HotelRepositoryError};
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{GatewayVerified, TokenVerificationError, TokenVerifier};
