//! OpenAPI schema definitions for domain and form types.
//!
//! Domain types stay framework agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their wire shape for documentation only.

use utoipa::ToSchema;

/// Stable machine-readable error codes returned in error responses.
#[derive(ToSchema)]
pub enum ErrorCodeSchema {
    /// The form is malformed or a field fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The token is missing, invalid, or lacks the `Admin` group.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The object store or record store rejected the call.
    #[schema(rename = "bad_gateway")]
    BadGateway,
    /// The object store or record store did not answer in time.
    #[schema(rename = "gateway_timeout")]
    GatewayTimeout,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Error response payload.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Human-readable message.
    #[schema(rename = "error", example = "hotelRating must be an integer, got 'four'")]
    message: String,
    /// Stable machine-readable error code.
    code: ErrorCodeSchema,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as the offending field.
    details: Option<serde_json::Value>,
}

/// Multipart form accepted by `POST /api/v1/hotels`.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct HotelFormSchema {
    /// Display name.
    #[schema(rename = "hotelName", example = "Grand Hotel")]
    hotel_name: String,
    /// Integer star rating between 1 and 5.
    #[schema(rename = "hotelRating", example = "4")]
    hotel_rating: String,
    /// City.
    #[schema(rename = "hotelCity", example = "Paris")]
    hotel_city: String,
    /// Non-negative integer nightly price.
    #[schema(rename = "hotelPrice", example = "180")]
    hotel_price: String,
    /// Submitting user; must equal the token subject.
    #[schema(rename = "userId")]
    user_id: Option<String>,
    /// Bearer token carrying `sub` and `cognito:groups`.
    #[schema(rename = "idToken")]
    id_token: String,
    /// Hotel image; its file name becomes the object key.
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Empty success body.
#[derive(ToSchema)]
pub struct EmptyResponseSchema {}
