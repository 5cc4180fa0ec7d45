//! Calendar keys used to bucket sale records by day and by month.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

const DAY_FORMAT: &str = "%Y-%m-%d";
const MONTH_FORMAT: &str = "%Y-%m";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors produced while parsing or combining calendar keys.
pub enum KeyError {
    InvalidDay(String),
    InvalidMonth(String),
    InvalidRange { start: DayKey, end: DayKey },
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::InvalidDay(value) => {
                write!(f, "`{value}` is not a valid day, expected YYYY-MM-DD")
            }
            KeyError::InvalidMonth(value) => {
                write!(f, "`{value}` is not a valid month, expected YYYY-MM")
            }
            KeyError::InvalidRange { start, end } => {
                write!(f, "date range end {end} is before start {start}")
            }
        }
    }
}

impl std::error::Error for KeyError {}

/// Calendar day identifying one bucket of sales, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::containing(*self)
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = KeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let raw = value.trim();
        if raw.len() != 10 {
            return Err(KeyError::InvalidDay(raw.to_string()));
        }
        NaiveDate::parse_from_str(raw, DAY_FORMAT)
            .map(Self)
            .map_err(|_| KeyError::InvalidDay(raw.to_string()))
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Year-month bucket, rendered as `YYYY-MM`. Internally anchored on the first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn containing(day: DayKey) -> Self {
        // Day 1 exists for every month chrono can represent.
        Self(day.date().with_day(1).unwrap_or(day.date()))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> DayKey {
        DayKey(self.0)
    }

    pub fn last_day(&self) -> DayKey {
        let next = self.next().0;
        match next.pred_opt() {
            Some(last) if next != self.0 => DayKey(last),
            _ => DayKey(self.0),
        }
    }

    pub fn next(&self) -> Self {
        self.0
            .checked_add_months(Months::new(1))
            .map(Self)
            .unwrap_or(*self)
    }

    pub fn previous(&self) -> Self {
        self.0
            .checked_sub_months(Months::new(1))
            .map(Self)
            .unwrap_or(*self)
    }

    pub fn contains(&self, day: DayKey) -> bool {
        day.date().year() == self.year() && day.date().month() == self.month()
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.first_day(),
            end: self.last_day(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(MONTH_FORMAT))
    }
}

impl FromStr for MonthKey {
    type Err = KeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let raw = value.trim();
        let invalid = || KeyError::InvalidMonth(raw.to_string());
        let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month).ok_or_else(invalid)
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DayKey,
    pub end: DayKey,
}

impl DateRange {
    pub fn new(start: DayKey, end: DayKey) -> Result<Self, KeyError> {
        if end < start {
            return Err(KeyError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(day: DayKey) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn contains(&self, day: DayKey) -> bool {
        day >= self.start && day <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_key_parses_strict_iso_dates() {
        let day: DayKey = "2024-05-10".parse().expect("valid day");
        assert_eq!(day.to_string(), "2024-05-10");
        assert!("2024-5-10".parse::<DayKey>().is_err());
        assert!("2024-02-30".parse::<DayKey>().is_err());
        assert!("tomorrow".parse::<DayKey>().is_err());
    }

    #[test]
    fn month_key_rejects_malformed_input() {
        let month: MonthKey = "2024-05".parse().expect("valid month");
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 5);
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("2024-5".parse::<MonthKey>().is_err());
        assert!("24-05".parse::<MonthKey>().is_err());
        assert!("2024-05-01".parse::<MonthKey>().is_err());
    }

    #[test]
    fn month_key_bounds_and_navigation() {
        let feb: MonthKey = "2024-02".parse().unwrap();
        assert_eq!(feb.first_day().to_string(), "2024-02-01");
        assert_eq!(feb.last_day().to_string(), "2024-02-29");
        assert_eq!(feb.previous().to_string(), "2024-01");
        assert_eq!("2024-12".parse::<MonthKey>().unwrap().next().to_string(), "2025-01");
        assert!(feb.contains("2024-02-29".parse().unwrap()));
        assert!(!feb.contains("2024-03-01".parse().unwrap()));
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        let start: DayKey = "2024-05-10".parse().unwrap();
        let end: DayKey = "2024-05-01".parse().unwrap();
        assert!(DateRange::new(start, end).is_err());
        let range = DateRange::new(end, start).expect("ordered range");
        assert!(range.contains(start));
        assert!(range.contains(end));
        assert!(!range.contains("2024-05-11".parse().unwrap()));
    }

    #[test]
    fn day_key_serializes_as_plain_string() {
        let day: DayKey = "2024-05-10".parse().unwrap();
        assert_eq!(serde_json::to_string(&day).unwrap(), "\"2024-05-10\"");
    }
}
