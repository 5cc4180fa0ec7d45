use canteen_domain::{DayKey, MonthKey};
use chrono::{DateTime, Utc};

/// Source of "now" for sale timestamps and the future-date check.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Day key of the current UTC date.
    fn today(&self) -> DayKey {
        DayKey::new(self.now().date_naive())
    }

    fn current_month(&self) -> MonthKey {
        self.today().month()
    }
}
