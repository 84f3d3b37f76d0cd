//! Port abstraction for hotel record persistence.
use async_trait::async_trait;

use crate::domain::{Hotel, OwnerId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by hotel repository adapters.
    pub enum HotelRepositoryError {
        /// The record store could not be reached.
        Connection { message: String } => "hotel repository connection failed: {message}",
        /// The write or scan failed during execution.
        Query { message: String } => "hotel repository query failed: {message}",
        /// A stored item could not be mapped back into a hotel.
        Corrupt { message: String } => "hotel repository returned an unreadable record: {message}",
    }
}

/// Owner-scoped storage of hotel listing records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HotelRepository: Send + Sync {
    /// Persist a record keyed by its identifier.
    async fn save(&self, hotel: &Hotel) -> Result<(), HotelRepositoryError>;

    /// Return every record owned by `owner`, in no particular order.
    async fn scan_by_owner(&self, owner: &OwnerId) -> Result<Vec<Hotel>, HotelRepositoryError>;
}
