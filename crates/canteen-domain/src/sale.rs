//! Sale records and the inputs used to create or modify them.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::keys::DayKey;

/// Opaque identifier of a sale record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(String);

impl SaleId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SaleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

fn default_quantity() -> u32 {
    1
}

/// A single canteen transaction.
///
/// `id`, `date` and `created_at` are fixed at construction. `total` is a cached
/// projection of `unit_price * quantity` and is recomputed on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    id: SaleId,
    date: DayKey,
    item: String,
    #[serde(with = "rust_decimal::serde::float")]
    unit_price: Decimal,
    #[serde(default = "default_quantity")]
    quantity: u32,
    #[serde(with = "rust_decimal::serde::float", default)]
    total: Decimal,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl SaleRecord {
    pub fn new(
        id: SaleId,
        date: DayKey,
        item: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut record = Self {
            id,
            date,
            item: item.into(),
            unit_price,
            quantity,
            total: Decimal::ZERO,
            created_at,
            updated_at: None,
        };
        record.refresh_total();
        record
    }

    pub fn id(&self) -> &SaleId {
        &self.id
    }

    pub fn date(&self) -> DayKey {
        self.date
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn computed_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    pub fn total_is_consistent(&self) -> bool {
        self.total == self.computed_total()
    }

    pub fn refresh_total(&mut self) {
        self.total = self.computed_total();
    }

    /// Merges the patch into the record and recomputes the total.
    pub fn apply(&mut self, patch: &SalePatch, at: DateTime<Utc>) {
        if let Some(item) = &patch.item {
            self.item = item.trim().to_string();
        }
        if let Some(price) = patch.unit_price {
            self.unit_price = price;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        self.refresh_total();
        self.updated_at = Some(at);
    }
}

/// User-supplied input for a new sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleDraft {
    pub item: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl SaleDraft {
    pub fn new(item: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            item: item.into(),
            unit_price,
            quantity: default_quantity(),
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Partial update for an existing sale. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalePatch {
    pub item: Option<String>,
    pub unit_price: Option<Decimal>,
    pub quantity: Option<u32>,
}

impl SalePatch {
    pub fn item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn unit_price(mut self, price: Decimal) -> Self {
        self.unit_price = Some(price);
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_none() && self.unit_price.is_none() && self.quantity.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample() -> SaleRecord {
        let created = Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap();
        SaleRecord::new(
            SaleId::new("sale-1"),
            "2024-05-10".parse().unwrap(),
            "Juice",
            dec!(3.50),
            2,
            created,
        )
    }

    #[test]
    fn new_record_derives_total() {
        let record = sample();
        assert_eq!(record.total(), dec!(7.00));
        assert!(record.total_is_consistent());
    }

    #[test]
    fn apply_recomputes_total_and_stamps_update() {
        let mut record = sample();
        let at = Utc.with_ymd_and_hms(2024, 5, 10, 10, 0, 0).unwrap();
        record.apply(&SalePatch::default().quantity(3), at);
        assert_eq!(record.total(), dec!(10.50));
        assert_eq!(record.updated_at(), Some(at));
        assert_eq!(record.item(), "Juice");
    }

    #[test]
    fn serializes_with_camel_case_layout() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "sale-1");
        assert_eq!(json["date"], "2024-05-10");
        assert_eq!(json["unitPrice"], 3.5);
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["total"], 7.0);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn missing_quantity_defaults_to_one() {
        let raw = r#"{
            "id": "1715333400000",
            "date": "2024-05-10",
            "item": "Snack",
            "unitPrice": 2.0,
            "createdAt": "2024-05-10T09:30:00Z"
        }"#;
        let record: SaleRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.quantity(), 1);
        assert_eq!(record.id().as_str(), "1715333400000");
    }
}
