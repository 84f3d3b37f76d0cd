//! In-memory adapters for local runs and tests.
//!
//! Each adapter is thread safe and supports one-shot failure injection so
//! tests can drive the creation pipeline into its partial-failure paths.

use std::sync::{Mutex, MutexGuard, PoisonError};

mod asset_store;
mod event_publisher;
mod hotel_repository;

pub use asset_store::InMemoryAssetStore;
pub use event_publisher::{InMemoryEventPublisher, PublishedEvent};
pub use hotel_repository::InMemoryHotelRepository;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
