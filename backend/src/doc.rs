//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the hotel creation endpoints, the health probes and
//! the schema wrappers from [`crate::inbound::http::schemas`]. The document
//! backs Swagger UI in debug builds and is exported by the `openapi-dump`
//! binary.

use crate::inbound::http::schemas::{
    EmptyResponseSchema, ErrorCodeSchema, ErrorSchema, HotelFormSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hotel admin API",
        description = "Creates hotel listings with an attached image on behalf of administrators.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::hotels::create_hotel,
        crate::inbound::http::hotels::preflight,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        HotelFormSchema,
        EmptyResponseSchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "hotels", description = "Hotel listing administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
