use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DeriveActiveEnum, EnumIter, sea_query::StringLen};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Largest number of image ids accepted in one bulk request
pub const MAX_BATCH_SIZE: u64 = 500;

pub const DEFAULT_SEQUENCE_START: i64 = 1;
pub const DEFAULT_SEQUENCE_DIGITS: u8 = 3;

/// Publication state of a catalog entry
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
}

/// A product created from an uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CatalogEntry {
    pub id: Uuid,
    /// Trimmed prefix, a space, then the zero-padded sequence number
    pub name: String,
    pub status: ProductStatus,
    pub price: Decimal,
    pub is_virtual: bool,
    /// Attachment id of the source image, fixed at creation
    pub primary_image: i64,
    pub category: Option<i64>,
    pub sequence_number: i64,
    pub created_at: DateTime<Utc>,
}

/// Everything the catalog store needs to insert one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub name: String,
    pub status: ProductStatus,
    pub price: Decimal,
    pub is_virtual: bool,
    pub primary_image: i64,
    pub sequence_number: i64,
}

/// Naming defaults applied to every entry in a batch
#[derive(Debug, Clone, PartialEq)]
pub struct NamingConfig {
    pub prefix: String,
    pub default_price: Decimal,
    pub default_category: Option<i64>,
}

/// Persisted catalog settings, including the sequence counter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CatalogSettings {
    pub product_prefix: String,
    pub default_price: Decimal,
    pub default_category: Option<i64>,
    /// First number issued when no number has been issued yet
    pub sequence_start: i64,
    /// Minimum width of the formatted number
    pub sequence_digits: u8,
    /// Last issued number; only the allocator writes it
    pub last_sequence_number: Option<i64>,
}

impl CatalogSettings {
    pub fn naming(&self) -> NamingConfig {
        NamingConfig {
            prefix: self.product_prefix.clone(),
            default_price: self.default_price,
            default_category: self.default_category,
        }
    }

    /// Number the allocator would issue next, `None` once the counter is exhausted.
    pub fn next_sequence_number(&self) -> Option<i64> {
        match self.last_sequence_number {
            Some(last) => last.checked_add(1),
            None => Some(self.sequence_start),
        }
    }

    /// Apply a partial update. The counter is never touched.
    pub fn apply(&mut self, update: UpdateSettings) {
        if let Some(prefix) = update.product_prefix {
            self.product_prefix = prefix;
        }
        if let Some(price) = update.default_price {
            self.default_price = price;
        }
        if let Some(category) = update.default_category {
            self.default_category = category;
        }
        if let Some(start) = update.sequence_start {
            self.sequence_start = start;
        }
        if let Some(digits) = update.sequence_digits {
            self.sequence_digits = digits;
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            product_prefix: String::new(),
            default_price: Decimal::ZERO,
            default_category: None,
            sequence_start: DEFAULT_SEQUENCE_START,
            sequence_digits: DEFAULT_SEQUENCE_DIGITS,
            last_sequence_number: None,
        }
    }
}

/// Prices are stored as NUMERIC(12,2).
const PRICE_SCALE: u32 = 2;
const PRICE_INTEGER_DIGITS: u32 = 10;

fn validate_price(value: &Decimal) -> Result<(), validator::ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(validator::ValidationError::new("negative_price"));
    }
    if value.normalize().scale() > PRICE_SCALE {
        return Err(validator::ValidationError::new("price_scale"));
    }
    if value.trunc() >= Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS)) {
        return Err(validator::ValidationError::new("price_range"));
    }
    Ok(())
}

/// Distinguishes an absent field from an explicit `null`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial settings update; omitted fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSettings {
    #[validate(length(max = 100))]
    pub product_prefix: Option<String>,

    #[validate(custom(function = "validate_price"))]
    pub default_price: Option<Decimal>,

    /// `null` clears the default category
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub default_category: Option<Option<i64>>,

    #[validate(range(min = 0))]
    pub sequence_start: Option<i64>,

    #[validate(range(min = 1, max = 10))]
    pub sequence_digits: Option<u8>,
}

/// Body of a bulk creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BulkCreateRequest {
    #[serde(default, alias = "imageIds")]
    #[validate(length(max = MAX_BATCH_SIZE))]
    pub image_ids: Vec<i64>,

    /// Admin JWT issued by the identity service. When empty, the
    /// `Authorization: Bearer` header is used instead.
    #[serde(default, alias = "authToken", alias = "nonce")]
    pub auth_token: String,
}

/// Outcome for one image id in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BatchResult {
    pub image_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BatchResult {
    pub fn created(image_id: i64, entry: &CatalogEntry) -> Self {
        Self {
            image_id,
            product_id: Some(entry.id),
            product_name: Some(entry.name.clone()),
            success: true,
            message: None,
        }
    }

    pub fn failed(image_id: i64, message: impl Into<String>) -> Self {
        Self {
            image_id,
            product_id: None,
            product_name: None,
            success: false,
            message: Some(message.into()),
        }
    }
}

/// `{ "success": bool, "data": ... }` wrapper used by the bulk endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }

    pub fn error(data: T) -> Self {
        Self {
            success: false,
            data,
        }
    }
}
