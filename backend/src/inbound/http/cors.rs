//! Cross-origin header policy for the hotel endpoints.
//!
//! Browsers call the API from the admin front end on another origin, so
//! every response (errors included) carries the same permissive headers.

use actix_web::HttpResponseBuilder;
use actix_web::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use actix_web::middleware::DefaultHeaders;

/// Origins allowed to call the API.
pub const ALLOW_ORIGIN: &str = "*";
/// Request headers clients may send.
pub const ALLOW_HEADERS: &str = "*";
/// Methods exposed on the hotel scope.
pub const ALLOW_METHODS: &str = "OPTIONS, POST";

/// Insert the policy headers on a response under construction.
pub fn apply(builder: &mut HttpResponseBuilder) {
    builder
        .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN))
        .insert_header((ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
        .insert_header((ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS));
}

/// Middleware adding the policy headers to responses that lack them.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use hotel_admin::inbound::http::cors;
///
/// let _app = App::new().service(web::scope("/api/v1").wrap(cors::headers()));
/// ```
pub fn headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN))
        .add((ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
        .add((ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
}
