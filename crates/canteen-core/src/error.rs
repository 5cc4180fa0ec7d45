use canteen_domain::{DayKey, KeyError, SaleId};
use thiserror::Error;
use uuid::Uuid;

/// Rejected user input. Raised before any persistence attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("item must not be empty")]
    EmptyItem,
    #[error("item must be at most {max} characters")]
    ItemTooLong { max: usize },
    #[error("price must be greater than zero")]
    NonPositivePrice,
    #[error("price must have at most {max} decimal places")]
    PriceTooPrecise { max: u32 },
    #[error("price must have at most {max} integer digits")]
    PriceTooLarge { max: u32 },
    #[error("quantity must be at least 1")]
    NonPositiveQuantity,
    #[error("`{0}` is not a valid number")]
    NotANumber(String),
    #[error("{0}")]
    InvalidKey(#[from] KeyError),
    #[error("sale date {day} is in the future (today is {today})")]
    FutureDate { day: DayKey, today: DayKey },
    #[error("nothing to update")]
    EmptyPatch,
    #[error("product name must not be empty")]
    EmptyProductName,
    #[error("category must be at most {max} characters")]
    CategoryTooLong { max: usize },
    #[error("a product named `{0}` already exists")]
    DuplicateProduct(String),
    #[error("{0}")]
    OutOfRange(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Sale not found: {0}")]
    NotFound(SaleId),
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}

impl From<KeyError> for CoreError {
    fn from(err: KeyError) -> Self {
        CoreError::Validation(ValidationError::InvalidKey(err))
    }
}

impl CoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound(_) | CoreError::ProductNotFound(_))
    }
}
