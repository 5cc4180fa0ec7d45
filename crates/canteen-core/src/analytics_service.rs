//! Read-only analytics over a sale snapshot.
//!
//! Every figure sums the record `total` (unit price times quantity).

use std::collections::{BTreeMap, HashMap};

use canteen_domain::{
    CategoryShare, DailyRevenue, DateRange, DayKey, ItemRanking, MonthComparison, MonthKey,
    PeriodStats, Product, SaleRecord, WeekdayTrend,
};
use chrono::Weekday;
use rust_decimal::Decimal;

use crate::ValidationError;

pub const MAX_RANKING_LIMIT: usize = 50;
pub const MAX_COMPARISON_MONTHS: u32 = 24;
pub const UNCATEGORIZED: &str = "Uncategorized";

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub struct AnalyticsService;

impl AnalyticsService {
    /// Best selling items by units within `range`. `limit` is capped at 50.
    pub fn top_items(
        records: &[SaleRecord],
        range: DateRange,
        limit: usize,
    ) -> Result<Vec<ItemRanking>, ValidationError> {
        if limit == 0 {
            return Err(ValidationError::OutOfRange(
                "ranking limit must be at least 1".into(),
            ));
        }
        let mut per_item: BTreeMap<&str, (u64, Decimal)> = BTreeMap::new();
        for record in in_range(records, range) {
            let entry = per_item.entry(record.item()).or_default();
            entry.0 += u64::from(record.quantity());
            entry.1 += record.total();
        }
        let all_units: u64 = per_item.values().map(|(units, _)| units).sum();

        let mut ranking: Vec<ItemRanking> = per_item
            .into_iter()
            .map(|(item, (units_sold, revenue))| ItemRanking {
                item: item.to_string(),
                units_sold,
                revenue,
                share_percent: percent(Decimal::from(units_sold), Decimal::from(all_units)),
            })
            .collect();
        ranking.sort_by(|a, b| b.units_sold.cmp(&a.units_sold));
        ranking.truncate(limit.min(MAX_RANKING_LIMIT));
        Ok(ranking)
    }

    /// Revenue of each day of `month` that had sales, oldest first.
    pub fn daily_revenue(records: &[SaleRecord], month: MonthKey) -> Vec<DailyRevenue> {
        let mut per_day: BTreeMap<DayKey, (Decimal, usize)> = BTreeMap::new();
        for record in in_range(records, month.range()) {
            let entry = per_day.entry(record.date()).or_default();
            entry.0 += record.total();
            entry.1 += 1;
        }
        per_day
            .into_iter()
            .map(|(day, (total, sale_count))| DailyRevenue {
                day,
                total,
                sale_count,
            })
            .collect()
    }

    /// Revenue per product category. Items with no matching product land in
    /// `Uncategorized`, as do products without a category.
    pub fn sales_by_category(
        records: &[SaleRecord],
        range: DateRange,
        products: &[Product],
    ) -> Vec<CategoryShare> {
        let categories: HashMap<String, &str> = products
            .iter()
            .map(|product| {
                (
                    product.name.trim().to_lowercase(),
                    product.category.as_deref().unwrap_or(UNCATEGORIZED),
                )
            })
            .collect();

        let mut per_category: BTreeMap<&str, (usize, Decimal)> = BTreeMap::new();
        for record in in_range(records, range) {
            let key = record.item().trim().to_lowercase();
            let category = categories.get(&key).copied().unwrap_or(UNCATEGORIZED);
            let entry = per_category.entry(category).or_default();
            entry.0 += 1;
            entry.1 += record.total();
        }
        let revenue_total: Decimal = per_category.values().map(|(_, revenue)| *revenue).sum();

        let mut shares: Vec<CategoryShare> = per_category
            .into_iter()
            .map(|(category, (sale_count, revenue))| CategoryShare {
                category: category.to_string(),
                sale_count,
                revenue,
                share_percent: percent(revenue, revenue_total),
            })
            .collect();
        shares.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        shares
    }

    /// The last `months` months ending with the month containing `today`,
    /// oldest first. Months without sales report zeros.
    pub fn monthly_comparison(
        records: &[SaleRecord],
        months: u32,
        today: DayKey,
    ) -> Result<Vec<MonthComparison>, ValidationError> {
        if !(1..=MAX_COMPARISON_MONTHS).contains(&months) {
            return Err(ValidationError::OutOfRange(format!(
                "months must be between 1 and {MAX_COMPARISON_MONTHS}"
            )));
        }
        let mut month = today.month();
        let mut keys = vec![month];
        for _ in 1..months {
            month = month.previous();
            keys.push(month);
        }
        keys.reverse();

        Ok(keys
            .into_iter()
            .map(|month| {
                let (total, sale_count) = totals(in_range(records, month.range()));
                MonthComparison {
                    month,
                    total,
                    sale_count,
                    average_ticket: average(total, sale_count),
                }
            })
            .collect())
    }

    pub fn period_stats(records: &[SaleRecord], range: DateRange) -> PeriodStats {
        let selected: Vec<&SaleRecord> = in_range(records, range).collect();
        let (total, sale_count) = totals(selected.iter().copied());

        // Counted per record, like a receipt tally; the earliest item wins ties.
        let mut frequency: Vec<(&str, usize)> = Vec::new();
        let mut per_day: BTreeMap<DayKey, Decimal> = BTreeMap::new();
        for record in &selected {
            match frequency.iter_mut().find(|(item, _)| *item == record.item()) {
                Some((_, count)) => *count += 1,
                None => frequency.push((record.item(), 1)),
            }
            *per_day.entry(record.date()).or_default() += record.total();
        }
        let top_item = frequency
            .iter()
            .fold(None::<(&str, usize)>, |best, &(item, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((item, count)),
            })
            .map(|(item, _)| item.to_string());
        let best_day = per_day
            .iter()
            .fold(None::<(DayKey, Decimal)>, |best, (&day, &revenue)| match best {
                Some((_, best_revenue)) if best_revenue >= revenue => best,
                _ => Some((day, revenue)),
            })
            .map(|(day, _)| day);

        PeriodStats {
            total,
            sale_count,
            average_ticket: average(total, sale_count),
            top_item,
            best_day,
        }
    }

    /// Revenue per weekday, Monday first. The average is per trading day: it
    /// divides by the number of distinct dates with sales on that weekday, not
    /// by the number of sale records.
    pub fn weekday_trend(records: &[SaleRecord], range: DateRange) -> Vec<WeekdayTrend> {
        let mut per_day: BTreeMap<DayKey, Decimal> = BTreeMap::new();
        for record in in_range(records, range) {
            *per_day.entry(record.date()).or_default() += record.total();
        }

        WEEK.iter()
            .map(|&weekday| {
                let (total, days_with_sales) = per_day
                    .iter()
                    .filter(|(day, _)| day.weekday() == weekday)
                    .fold((Decimal::ZERO, 0usize), |(sum, days), (_, revenue)| {
                        (sum + *revenue, days + 1)
                    });
                WeekdayTrend {
                    weekday,
                    total,
                    days_with_sales,
                    average_per_day: average(total, days_with_sales),
                }
            })
            .collect()
    }
}

fn in_range(records: &[SaleRecord], range: DateRange) -> impl Iterator<Item = &SaleRecord> {
    records
        .iter()
        .filter(move |record| range.contains(record.date()))
}

fn totals<'a>(records: impl Iterator<Item = &'a SaleRecord>) -> (Decimal, usize) {
    records.fold((Decimal::ZERO, 0), |(sum, count), record| {
        (sum + record.total(), count + 1)
    })
}

fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

fn percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        (part * Decimal::ONE_HUNDRED / whole).round_dp(2)
    }
}
