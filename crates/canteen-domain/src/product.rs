//! Catalog products offered by the canteen.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub default_price: Decimal,
    #[serde(default = "Product::default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(draft: ProductDraft, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            category: normalize_category(draft.category),
            default_price: draft.default_price,
            active: true,
            created_at: at,
            updated_at: at,
        }
    }

    pub fn default_active() -> bool {
        true
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    pub fn apply(&mut self, patch: &ProductPatch, at: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(category) = &patch.category {
            self.category = normalize_category(Some(category.clone()));
        }
        if let Some(price) = patch.default_price {
            self.default_price = price;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        self.updated_at = at;
    }
}

fn normalize_category(category: Option<String>) -> Option<String> {
    category
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub category: Option<String>,
    pub default_price: Decimal,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, default_price: Decimal) -> Self {
        Self {
            name: name.into(),
            category: None,
            default_price,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Partial product update. An empty `category` string clears the category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub default_price: Option<Decimal>,
    pub active: Option<bool>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.default_price.is_none()
            && self.active.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn blank_category_is_cleared() {
        let now = Utc::now();
        let mut product = Product::new(
            ProductDraft::new(" Orange Juice ", dec!(5.50)).with_category("drinks"),
            now,
        );
        assert_eq!(product.name, "Orange Juice");
        assert_eq!(product.category.as_deref(), Some("drinks"));

        let patch = ProductPatch {
            category: Some("  ".into()),
            ..ProductPatch::default()
        };
        product.apply(&patch, now);
        assert!(product.category.is_none());
        assert!(product.matches_name("orange juice"));
    }
}
