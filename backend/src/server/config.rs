//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use hotel_admin::domain::ports::HotelCreationService;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) hotels: Arc<dyn HotelCreationService>,
    pub(crate) max_upload_bytes: usize,
}

impl ServerConfig {
    /// Construct a configuration serving `hotels` on `bind_addr`.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        hotels: Arc<dyn HotelCreationService>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            bind_addr,
            hotels,
            max_upload_bytes,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
