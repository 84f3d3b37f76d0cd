//! DynamoDB-backed hotel repository.
//!
//! Items use the record's wire names as attribute names: `id` (partition
//! key), `name`, `cityName`, `rating`, `price`, `userId`, `fileName`.
//! Owner lookups scan the table with a `userId` filter and follow
//! pagination until the last page.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::debug;

use crate::domain::ports::{HotelRepository, HotelRepositoryError};
use crate::domain::{
    AssetKey, CityName, Hotel, HotelDraft, HotelId, HotelName, OwnerId, Price, Rating,
};

type Item = HashMap<String, AttributeValue>;

/// [`HotelRepository`] storing one item per hotel in a DynamoDB table.
#[derive(Debug, Clone)]
pub struct DynamoDbHotelRepository {
    client: Client,
    table: String,
}

impl DynamoDbHotelRepository {
    /// Create a repository for `table`.
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

fn map_sdk_error<E, R>(err: SdkError<E, R>) -> HotelRepositoryError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            HotelRepositoryError::connection(message)
        }
        _ => HotelRepositoryError::query(message),
    }
}

fn to_item(hotel: &Hotel) -> Item {
    HashMap::from([
        ("id".to_owned(), AttributeValue::S(hotel.id().to_string())),
        ("name".to_owned(), AttributeValue::S(hotel.name().to_string())),
        ("cityName".to_owned(), AttributeValue::S(hotel.city().to_string())),
        (
            "rating".to_owned(),
            AttributeValue::N(hotel.rating().value().to_string()),
        ),
        (
            "price".to_owned(),
            AttributeValue::N(hotel.price().value().to_string()),
        ),
        ("userId".to_owned(), AttributeValue::S(hotel.owner().to_string())),
        (
            "fileName".to_owned(),
            AttributeValue::S(hotel.file_name().to_string()),
        ),
    ])
}

fn corrupt(attribute: &str, detail: impl std::fmt::Display) -> HotelRepositoryError {
    HotelRepositoryError::corrupt(format!("{attribute}: {detail}"))
}

fn string_attr<'a>(item: &'a Item, name: &str) -> Result<&'a str, HotelRepositoryError> {
    item.get(name)
        .and_then(|value| value.as_s().ok())
        .map(String::as_str)
        .ok_or_else(|| corrupt(name, "missing string attribute"))
}

fn number_attr(item: &Item, name: &str) -> Result<i64, HotelRepositoryError> {
    item.get(name)
        .and_then(|value| value.as_n().ok())
        .ok_or_else(|| corrupt(name, "missing number attribute"))?
        .parse()
        .map_err(|err| corrupt(name, err))
}

fn from_item(item: &Item) -> Result<Hotel, HotelRepositoryError> {
    let id = HotelId::new(string_attr(item, "id")?).map_err(|err| corrupt("id", err))?;
    let draft = HotelDraft {
        name: HotelName::new(string_attr(item, "name")?).map_err(|err| corrupt("name", err))?,
        city: CityName::new(string_attr(item, "cityName")?)
            .map_err(|err| corrupt("cityName", err))?,
        rating: Rating::new(number_attr(item, "rating")?).map_err(|err| corrupt("rating", err))?,
        price: Price::new(number_attr(item, "price")?).map_err(|err| corrupt("price", err))?,
        owner: OwnerId::new(string_attr(item, "userId")?).map_err(|err| corrupt("userId", err))?,
        file_name: AssetKey::new(string_attr(item, "fileName")?)
            .map_err(|err| corrupt("fileName", err))?,
    };
    Ok(Hotel::from_draft(id, draft))
}

#[async_trait]
impl HotelRepository for DynamoDbHotelRepository {
    async fn save(&self, hotel: &Hotel) -> Result<(), HotelRepositoryError> {
        debug!(table = %self.table, hotel_id = %hotel.id(), "PutItem");
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(to_item(hotel)))
            .send()
            .await
            .map_err(map_sdk_error)?;
        Ok(())
    }

    async fn scan_by_owner(&self, owner: &OwnerId) -> Result<Vec<Hotel>, HotelRepositoryError> {
        let mut hotels = Vec::new();
        let mut start_key: Option<Item> = None;
        loop {
            let page = self
                .client
                .scan()
                .table_name(&self.table)
                .filter_expression("userId = :owner")
                .expression_attribute_values(":owner", AttributeValue::S(owner.to_string()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(map_sdk_error)?;
            for item in page.items() {
                hotels.push(from_item(item)?);
            }
            match page.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }
        debug!(table = %self.table, owner = %owner, count = hotels.len(), "scanned hotels");
        Ok(hotels)
    }
}
