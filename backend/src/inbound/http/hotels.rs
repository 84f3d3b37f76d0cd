//! Hotel API handlers.
//!
//! ```text
//! POST /api/v1/hotels      multipart/form-data (hotelName, hotelRating, hotelCity,
//!                          hotelPrice, userId, idToken, file)
//! OPTIONS /api/v1/hotels   CORS preflight
//! ```

use actix_web::{HttpRequest, HttpResponse, post, route, web};
use serde_json::json;

use crate::inbound::http::ApiResult;
use crate::inbound::http::multipart::MultipartIngestor;
use crate::inbound::http::schemas::{EmptyResponseSchema, ErrorSchema, HotelFormSchema};
use crate::inbound::http::state::HttpState;

/// Create a hotel listing from a multipart submission.
///
/// The caller must present an `idToken` whose `cognito:groups` claim contains
/// `Admin`. The attached image is stored under its file name before the
/// record is written; a creation event is then published on a best-effort
/// basis.
#[utoipa::path(
    post,
    path = "/api/v1/hotels",
    request_body(content = HotelFormSchema, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Hotel created", body = EmptyResponseSchema),
        (status = 400, description = "Malformed form or invalid field", body = ErrorSchema),
        (status = 401, description = "Missing, invalid, or non-admin token", body = ErrorSchema),
        (status = 502, description = "Object store or record store failure", body = ErrorSchema),
        (status = 504, description = "Object store or record store timed out", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["hotels"],
    operation_id = "createHotel"
)]
#[post("/hotels")]
pub async fn create_hotel(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let ingestor = state.ingestor;
    let boundary = MultipartIngestor::boundary(req.headers())?;
    let body = ingestor.collect(payload).await?;
    let body = MultipartIngestor::decode_transfer_encoding(req.headers(), body)?;
    let form = ingestor.ingest(body, &boundary).await?;

    state.hotels.create(form.into_request()).await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// Answer CORS preflight requests for the hotel endpoint.
#[utoipa::path(
    options,
    path = "/api/v1/hotels",
    responses((status = 200, description = "Preflight accepted")),
    tags = ["hotels"],
    operation_id = "preflightHotels"
)]
#[route("/hotels", method = "OPTIONS")]
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}
