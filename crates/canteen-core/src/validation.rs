//! Input rules shared by the ledger and the catalog.

use std::str::FromStr;

use canteen_domain::{DayKey, MonthKey, ProductDraft, ProductPatch, SaleDraft, SalePatch};
use rust_decimal::Decimal;

use crate::ValidationError;

pub const MAX_ITEM_LEN: usize = 100;
pub const MAX_CATEGORY_LEN: usize = 50;
pub const MAX_PRICE_SCALE: u32 = 2;
pub const MAX_PRICE_INTEGER_DIGITS: u32 = 8;

/// Returns the trimmed item label.
pub fn validate_item(item: &str) -> Result<String, ValidationError> {
    let trimmed = item.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyItem);
    }
    if trimmed.chars().count() > MAX_ITEM_LEN {
        return Err(ValidationError::ItemTooLong { max: MAX_ITEM_LEN });
    }
    Ok(trimmed.to_string())
}

pub fn validate_price(price: Decimal) -> Result<Decimal, ValidationError> {
    if price <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice);
    }
    if price.normalize().scale() > MAX_PRICE_SCALE {
        return Err(ValidationError::PriceTooPrecise {
            max: MAX_PRICE_SCALE,
        });
    }
    let limit = Decimal::from(10u64.pow(MAX_PRICE_INTEGER_DIGITS));
    if price.trunc() >= limit {
        return Err(ValidationError::PriceTooLarge {
            max: MAX_PRICE_INTEGER_DIGITS,
        });
    }
    Ok(price)
}

pub fn validate_quantity(quantity: u32) -> Result<u32, ValidationError> {
    if quantity == 0 {
        return Err(ValidationError::NonPositiveQuantity);
    }
    Ok(quantity)
}

/// Checks a draft and returns it with the item label trimmed.
pub fn validate_draft(draft: &SaleDraft) -> Result<SaleDraft, ValidationError> {
    Ok(SaleDraft {
        item: validate_item(&draft.item)?,
        unit_price: validate_price(draft.unit_price)?,
        quantity: validate_quantity(draft.quantity)?,
    })
}

pub fn validate_patch(patch: &SalePatch) -> Result<SalePatch, ValidationError> {
    if patch.is_empty() {
        return Err(ValidationError::EmptyPatch);
    }
    Ok(SalePatch {
        item: patch.item.as_deref().map(validate_item).transpose()?,
        unit_price: patch.unit_price.map(validate_price).transpose()?,
        quantity: patch.quantity.map(validate_quantity).transpose()?,
    })
}

pub fn validate_product_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyProductName);
    }
    if trimmed.chars().count() > MAX_ITEM_LEN {
        return Err(ValidationError::ItemTooLong { max: MAX_ITEM_LEN });
    }
    Ok(trimmed.to_string())
}

pub fn validate_category(category: &str) -> Result<String, ValidationError> {
    let trimmed = category.trim();
    if trimmed.chars().count() > MAX_CATEGORY_LEN {
        return Err(ValidationError::CategoryTooLong {
            max: MAX_CATEGORY_LEN,
        });
    }
    Ok(trimmed.to_string())
}

pub fn validate_product_draft(draft: &ProductDraft) -> Result<ProductDraft, ValidationError> {
    Ok(ProductDraft {
        name: validate_product_name(&draft.name)?,
        category: draft.category.as_deref().map(validate_category).transpose()?,
        default_price: validate_price(draft.default_price)?,
    })
}

pub fn validate_product_patch(patch: &ProductPatch) -> Result<ProductPatch, ValidationError> {
    if patch.is_empty() {
        return Err(ValidationError::EmptyPatch);
    }
    Ok(ProductPatch {
        name: patch.name.as_deref().map(validate_product_name).transpose()?,
        category: patch.category.as_deref().map(validate_category).transpose()?,
        default_price: patch.default_price.map(validate_price).transpose()?,
        active: patch.active,
    })
}

/// Parses a price typed by a user. Accepts `,` as decimal separator.
pub fn parse_price(raw: &str) -> Result<Decimal, ValidationError> {
    let normalized = raw.trim().replace(',', ".");
    let price = Decimal::from_str(&normalized)
        .map_err(|_| ValidationError::NotANumber(raw.trim().to_string()))?;
    validate_price(price)
}

pub fn parse_quantity(raw: &str) -> Result<u32, ValidationError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber(raw.trim().to_string()))?;
    if value < 1 {
        return Err(ValidationError::NonPositiveQuantity);
    }
    u32::try_from(value)
        .map_err(|_| ValidationError::OutOfRange(format!("quantity {value} is too large")))
}

pub fn parse_day(raw: &str) -> Result<DayKey, ValidationError> {
    Ok(raw.parse::<DayKey>()?)
}

pub fn parse_month(raw: &str) -> Result<MonthKey, ValidationError> {
    Ok(raw.parse::<MonthKey>()?)
}
