//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::HotelCreationService;

use super::multipart::MultipartIngestor;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Creation pipeline.
    pub hotels: Arc<dyn HotelCreationService>,
    /// Form reader configured with the upload limit.
    pub ingestor: MultipartIngestor,
}

impl HttpState {
    /// Construct state from the creation port and upload limit.
    pub fn new(hotels: Arc<dyn HotelCreationService>, max_upload_bytes: usize) -> Self {
        Self {
            hotels,
            ingestor: MultipartIngestor::new(max_upload_bytes),
        }
    }
}
