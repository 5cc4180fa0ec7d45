//! Aggregated views over sale records.

use chrono::Weekday;
use rust_decimal::Decimal;

use crate::{
    keys::{DayKey, MonthKey},
    sale::SaleRecord,
};

#[derive(Debug, Clone, PartialEq)]
/// Totals for a single selected day.
pub struct DaySummary {
    pub day: DayKey,
    pub total: Decimal,
    pub sale_count: usize,
    pub units_sold: u64,
}

#[derive(Debug, Clone, PartialEq)]
/// Totals for a single selected month.
pub struct MonthSummary {
    pub month: MonthKey,
    pub total: Decimal,
    pub sale_count: usize,
    pub units_sold: u64,
}

#[derive(Debug, Clone, PartialEq)]
/// Records of one day inside a month report, with their subtotal.
pub struct DayBucket {
    pub day: DayKey,
    pub records: Vec<SaleRecord>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRanking {
    pub item: String,
    pub units_sold: u64,
    pub revenue: Decimal,
    pub share_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRevenue {
    pub day: DayKey,
    pub total: Decimal,
    pub sale_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub sale_count: usize,
    pub revenue: Decimal,
    pub share_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthComparison {
    pub month: MonthKey,
    pub total: Decimal,
    pub sale_count: usize,
    pub average_ticket: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
/// Executive summary of a date range.
pub struct PeriodStats {
    pub total: Decimal,
    pub sale_count: usize,
    pub average_ticket: Decimal,
    pub top_item: Option<String>,
    pub best_day: Option<DayKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayTrend {
    pub weekday: Weekday,
    pub total: Decimal,
    pub days_with_sales: usize,
    pub average_per_day: Decimal,
}
