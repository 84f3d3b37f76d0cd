//! Multipart form ingestion for hotel submissions.
//!
//! The body is buffered in full (bounded by the configured upload limit)
//! and then parsed with `multer`. Text parts become fields; the first part
//! carrying a non-empty file name becomes the attachment and later file
//! parts are drained and ignored.

use std::collections::HashMap;
use std::convert::Infallible;

use actix_web::http::header::{CONTENT_TYPE, HeaderMap};
use actix_web::web;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt as _;
use multer::Multipart;
use thiserror::Error;
use tracing::debug;

use crate::domain::Error;
use crate::domain::ports::{Attachment, CreateHotelRequest, HotelFormFields};

/// Header used by gateways to mark a base64-wrapped binary body.
pub const TRANSFER_ENCODING_HEADER: &str = "content-transfer-encoding";

/// Form field names of a hotel submission.
pub mod field_names {
    /// Hotel display name.
    pub const NAME: &str = "hotelName";
    /// Star rating.
    pub const RATING: &str = "hotelRating";
    /// City.
    pub const CITY: &str = "hotelCity";
    /// Nightly price.
    pub const PRICE: &str = "hotelPrice";
    /// Submitting user.
    pub const USER_ID: &str = "userId";
    /// Bearer token.
    pub const ID_TOKEN: &str = "idToken";
}

/// Reasons a request body cannot be read as a hotel form.
#[derive(Debug, Error)]
pub enum MalformedBody {
    /// The content type carries no multipart boundary.
    #[error("request must be multipart/form-data with a boundary")]
    MissingBoundary,
    /// The body was marked base64 but did not decode.
    #[error("request body is not valid base64")]
    Base64,
    /// The body exceeded the configured limit.
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    /// The attachment exceeded the configured limit.
    #[error("attachment exceeds {limit} bytes")]
    FileTooLarge { limit: usize },
    /// The payload stream failed while being read.
    #[error("request body could not be read")]
    Payload,
    /// The multipart structure is invalid. Parser detail stays in the logs.
    #[error("malformed multipart body")]
    Multipart(#[from] multer::Error),
}

impl From<MalformedBody> for Error {
    fn from(value: MalformedBody) -> Self {
        match &value {
            MalformedBody::Multipart(source) => {
                debug!(error = %value, detail = %source, "rejected malformed hotel form");
            }
            _ => debug!(error = %value, "rejected malformed hotel form"),
        }
        Error::invalid_request(value.to_string())
    }
}

/// Text fields and optional attachment read from a form.
#[derive(Debug, Default)]
pub struct IngestedForm {
    fields: HashMap<String, String>,
    attachment: Option<Attachment>,
}

impl IngestedForm {
    /// Text value of `name`; repeated fields keep their first value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The first file part, if any.
    #[must_use]
    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Convert into the creation port's request.
    #[must_use]
    pub fn into_request(mut self) -> CreateHotelRequest {
        let mut take = |name: &str| self.fields.remove(name);
        let fields = HotelFormFields {
            name: take(field_names::NAME),
            city: take(field_names::CITY),
            rating: take(field_names::RATING),
            price: take(field_names::PRICE),
            user_id: take(field_names::USER_ID),
        };
        let id_token = take(field_names::ID_TOKEN);
        CreateHotelRequest {
            fields,
            id_token,
            attachment: self.attachment,
        }
    }
}

/// Reads multipart hotel submissions within a size budget.
#[derive(Debug, Clone, Copy)]
pub struct MultipartIngestor {
    max_upload_bytes: usize,
}

/// Allowance for text fields and part headers on top of the attachment.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

impl MultipartIngestor {
    /// Create an ingestor accepting attachments up to `max_upload_bytes`.
    #[must_use]
    pub fn new(max_upload_bytes: usize) -> Self {
        Self { max_upload_bytes }
    }

    /// Largest raw body accepted, allowing for base64 inflation.
    #[must_use]
    pub fn body_limit(&self) -> usize {
        self.max_upload_bytes
            .saturating_add(FORM_OVERHEAD_BYTES)
            .saturating_mul(4)
            / 3
            + 4
    }

    /// Extract the multipart boundary from the request headers.
    pub fn boundary(headers: &HeaderMap) -> Result<String, MalformedBody> {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .ok_or(MalformedBody::MissingBoundary)?;
        multer::parse_boundary(content_type).map_err(|_| MalformedBody::MissingBoundary)
    }

    /// Buffer the request payload, rejecting bodies over [`Self::body_limit`].
    pub async fn collect(&self, mut payload: web::Payload) -> Result<Bytes, MalformedBody> {
        let limit = self.body_limit();
        let mut body = BytesMut::new();
        while let Some(chunk) = payload.next().await {
            let chunk = chunk.map_err(|_| MalformedBody::Payload)?;
            if body.len() + chunk.len() > limit {
                return Err(MalformedBody::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }

    /// Undo a gateway's base64 wrapping when the headers announce it.
    pub fn decode_transfer_encoding(
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<Bytes, MalformedBody> {
        let is_base64 = headers
            .get(TRANSFER_ENCODING_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("base64"));
        if !is_base64 {
            return Ok(body);
        }
        let compact: Vec<u8> = body
            .iter()
            .copied()
            .filter(|byte| !byte.is_ascii_whitespace())
            .collect();
        STANDARD
            .decode(compact)
            .map(Bytes::from)
            .map_err(|_| MalformedBody::Base64)
    }

    /// Parse `body` as multipart data delimited by `boundary`.
    pub async fn ingest(&self, body: Bytes, boundary: &str) -> Result<IngestedForm, MalformedBody> {
        let stream = futures_util::stream::once(async move { Ok::<Bytes, Infallible>(body) });
        let mut multipart = Multipart::new(stream, boundary);
        let mut form = IngestedForm::default();

        while let Some(mut field) = multipart.next_field().await? {
            let file_name = field
                .file_name()
                .map(str::to_owned)
                .filter(|name| !name.is_empty());
            match (file_name, field.name().map(str::to_owned)) {
                (Some(file_name), _) if form.attachment.is_none() => {
                    let content_type = field.content_type().map(ToString::to_string);
                    let mut data = BytesMut::new();
                    while let Some(chunk) = field.chunk().await? {
                        if data.len() + chunk.len() > self.max_upload_bytes {
                            return Err(MalformedBody::FileTooLarge {
                                limit: self.max_upload_bytes,
                            });
                        }
                        data.extend_from_slice(&chunk);
                    }
                    form.attachment = Some(Attachment {
                        file_name,
                        content_type,
                        data: data.freeze(),
                    });
                }
                (Some(file_name), _) => {
                    debug!(%file_name, "ignoring additional file part");
                    while field.chunk().await?.is_some() {}
                }
                (None, Some(name)) if field.file_name().is_none() => {
                    let text = field.text().await?;
                    form.fields.entry(name).or_insert(text);
                }
                (None, _) => while field.chunk().await?.is_some() {},
            }
        }
        Ok(form)
    }
}
