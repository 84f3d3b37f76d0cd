//! HTTP inbound adapter exposing REST endpoints.

pub mod cors;
pub mod error;
pub mod health;
pub mod hotels;
pub mod multipart;
pub mod schemas;
pub mod state;

pub use error::ApiResult;
