//! Hotel listing administration backend.
//!
//! Layout follows ports and adapters: [`domain`] holds the creation pipeline
//! and its ports, [`inbound`] the HTTP surface, [`outbound`] the adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
