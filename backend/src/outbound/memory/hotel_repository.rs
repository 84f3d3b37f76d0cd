//! Record store held in a map keyed by hotel id.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::domain::ports::{HotelRepository, HotelRepositoryError};
use crate::domain::{Hotel, HotelId, OwnerId};

/// [`HotelRepository`] keeping records in memory.
#[derive(Debug, Default)]
pub struct InMemoryHotelRepository {
    hotels: Mutex<HashMap<HotelId, Hotel>>,
    next_failure: Mutex<Option<HotelRepositoryError>>,
}

impl InMemoryHotelRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `save` fail with `error`.
    pub fn fail_next(&self, error: HotelRepositoryError) {
        *lock(&self.next_failure) = Some(error);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        lock(&self.hotels).len()
    }

    /// Whether no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HotelRepository for InMemoryHotelRepository {
    async fn save(&self, hotel: &Hotel) -> Result<(), HotelRepositoryError> {
        if let Some(error) = lock(&self.next_failure).take() {
            return Err(error);
        }
        lock(&self.hotels).insert(hotel.id(), hotel.clone());
        Ok(())
    }

    async fn scan_by_owner(&self, owner: &OwnerId) -> Result<Vec<Hotel>, HotelRepositoryError> {
        Ok(lock(&self.hotels)
            .values()
            .filter(|hotel| hotel.owner() == owner)
            .cloned()
            .collect())
    }
}
