//! Hotel listing record and its validated fields.
//!
//! Every field is a value object that validates on construction, so a
//! [`Hotel`] that exists is a record that may be persisted. Serialisation
//! uses plain strings and numbers (`camelCase` keys) so adapters can store
//! the record as-is.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lowest accepted star rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted star rating.
pub const RATING_MAX: u8 = 5;
/// Maximum length (in characters) of hotel and city names.
pub const NAME_MAX: usize = 200;
/// Maximum length (in bytes) of an asset key.
pub const ASSET_KEY_MAX: usize = 1024;

/// Validation errors raised while building hotel fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotelValidationError {
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    /// A text field exceeded its length limit.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    /// A numeric field could not be parsed as an integer.
    #[error("{field} must be an integer, got '{value}'")]
    NotAnInteger { field: &'static str, value: String },
    /// The rating fell outside the accepted range.
    #[error("hotelRating must be between {min} and {max}, got {value}")]
    RatingOutOfRange { value: i64, min: u8, max: u8 },
    /// The price was negative or too large.
    #[error("hotelPrice must be a non-negative integer no larger than {max}, got {value}")]
    PriceOutOfRange { value: i64, max: u32 },
    /// The owner identifier had surrounding whitespace.
    #[error("userId must not contain surrounding whitespace")]
    OwnerWhitespace,
    /// The asset key was not a bare file name.
    #[error("file name '{value}' must be a bare file name")]
    InvalidAssetKey { value: String },
    /// The hotel identifier was not a UUID.
    #[error("hotel id must be a valid UUID")]
    InvalidId,
}

impl HotelValidationError {
    /// Form field (or record attribute) the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::TooLong { field, .. }
            | Self::NotAnInteger { field, .. } => field,
            Self::RatingOutOfRange { .. } => "hotelRating",
            Self::PriceOutOfRange { .. } => "hotelPrice",
            Self::OwnerWhitespace => "userId",
            Self::InvalidAssetKey { .. } => "file",
            Self::InvalidId => "id",
        }
    }
}

fn bounded_text(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<String, HotelValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HotelValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(HotelValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

fn parse_integer(field: &'static str, raw: &str) -> Result<i64, HotelValidationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| HotelValidationError::NotAnInteger {
            field,
            value: raw.to_owned(),
        })
}

/// Globally unique hotel identifier, generated once per successful creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HotelId(Uuid);

impl HotelId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its hyphenated string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, HotelValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| HotelValidationError::InvalidId)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for HotelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<HotelId> for String {
    fn from(value: HotelId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for HotelId {
    type Error = HotelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

macro_rules! text_value {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the value; surrounding whitespace is trimmed.
            pub fn new(value: impl Into<String>) -> Result<Self, HotelValidationError> {
                bounded_text($field, value.into(), $max).map(Self)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = HotelValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

text_value!(
    /// Display name of the hotel.
    HotelName,
    "hotelName",
    NAME_MAX
);

text_value!(
    /// City the hotel is located in.
    CityName,
    "hotelCity",
    NAME_MAX
);

/// Star rating between [`RATING_MIN`] and [`RATING_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    /// Validate an integer rating.
    pub fn new(value: i64) -> Result<Self, HotelValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|rating| (RATING_MIN..=RATING_MAX).contains(rating))
            .map(Self)
            .ok_or(HotelValidationError::RatingOutOfRange {
                value,
                min: RATING_MIN,
                max: RATING_MAX,
            })
    }

    /// Parse a rating submitted as form text.
    ///
    /// # Examples
    /// ```
    /// use hotel_admin::domain::Rating;
    ///
    /// assert_eq!(Rating::parse(" 4 ").map(|r| r.value()), Ok(4));
    /// assert!(Rating::parse("four").is_err());
    /// assert!(Rating::parse("9").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, HotelValidationError> {
        Self::new(parse_integer("hotelRating", raw)?)
    }

    /// Numeric rating.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<Rating> for i64 {
    fn from(value: Rating) -> Self {
        i64::from(value.0)
    }
}

impl TryFrom<i64> for Rating {
    type Error = HotelValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Non-negative nightly price in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Price(u32);

impl Price {
    /// Validate an integer price.
    pub fn new(value: i64) -> Result<Self, HotelValidationError> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| HotelValidationError::PriceOutOfRange {
                value,
                max: u32::MAX,
            })
    }

    /// Parse a price submitted as form text.
    pub fn parse(raw: &str) -> Result<Self, HotelValidationError> {
        Self::new(parse_integer("hotelPrice", raw)?)
    }

    /// Numeric price.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<Price> for i64 {
    fn from(value: Price) -> Self {
        i64::from(value.0)
    }
}

impl TryFrom<i64> for Price {
    type Error = HotelValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identifier of the user owning a hotel, taken from the token subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    /// Validate an owner identifier: non-empty and without surrounding whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, HotelValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(HotelValidationError::Empty { field: "userId" });
        }
        if raw.trim() != raw {
            return Err(HotelValidationError::OwnerWhitespace);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<OwnerId> for String {
    fn from(value: OwnerId) -> Self {
        value.0
    }
}

impl TryFrom<String> for OwnerId {
    type Error = HotelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Object-store key of an uploaded image: the submitted file name.
///
/// Keys are bare file names. Path separators, `..`, and control characters
/// are rejected so a submission cannot address another prefix. Two uploads
/// with the same name share a key and the later one wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetKey(String);

impl AssetKey {
    /// Validate an asset key.
    ///
    /// # Examples
    /// ```
    /// use hotel_admin::domain::AssetKey;
    ///
    /// assert!(AssetKey::new("lobby.jpg").is_ok());
    /// assert!(AssetKey::new("../secrets.txt").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, HotelValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(HotelValidationError::Empty { field: "file" });
        }
        let invalid = raw.len() > ASSET_KEY_MAX
            || raw == "."
            || raw.contains("..")
            || raw.contains(['/', '\\'])
            || raw.chars().any(char::is_control)
            || raw.trim() != raw;
        if invalid {
            return Err(HotelValidationError::InvalidAssetKey { value: raw });
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for AssetKey {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AssetKey> for String {
    fn from(value: AssetKey) -> Self {
        value.0
    }
}

impl TryFrom<String> for AssetKey {
    type Error = HotelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated hotel fields awaiting an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelDraft {
    /// Display name.
    pub name: HotelName,
    /// City name.
    pub city: CityName,
    /// Star rating.
    pub rating: Rating,
    /// Nightly price.
    pub price: Price,
    /// Owning user.
    pub owner: OwnerId,
    /// Key of the stored image.
    pub file_name: AssetKey,
}

/// Persisted hotel listing record.
///
/// ## Invariants
/// - `id` and `owner` never change once the record exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    id: HotelId,
    name: HotelName,
    #[serde(rename = "cityName")]
    city: CityName,
    rating: Rating,
    price: Price,
    #[serde(rename = "userId")]
    owner: OwnerId,
    file_name: AssetKey,
}

impl Hotel {
    /// Assign an identifier to a validated draft.
    #[must_use]
    pub fn from_draft(id: HotelId, draft: HotelDraft) -> Self {
        let HotelDraft {
            name,
            city,
            rating,
            price,
            owner,
            file_name,
        } = draft;
        Self {
            id,
            name,
            city,
            rating,
            price,
            owner,
            file_name,
        }
    }

    /// Record identifier.
    #[must_use]
    pub fn id(&self) -> HotelId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &HotelName {
        &self.name
    }

    /// City name.
    #[must_use]
    pub fn city(&self) -> &CityName {
        &self.city
    }

    /// Star rating.
    #[must_use]
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Nightly price.
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Owning user.
    #[must_use]
    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Key of the stored image.
    #[must_use]
    pub fn file_name(&self) -> &AssetKey {
        &self.file_name
    }
}
