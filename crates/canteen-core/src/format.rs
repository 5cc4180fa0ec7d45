use canteen_domain::DayKey;
use rust_decimal::Decimal;

/// Formats monetary amounts for presentation. Rounding to cents happens here only.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: Decimal) -> String;
}

/// Formats calendar days for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_day(&self, day: DayKey) -> String;
}
