use chrono::{DateTime, Local, Utc};

use canteen_core::Clock;
use canteen_domain::DayKey;

/// Wall clock. Timestamps are UTC; `today` follows the local calendar.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> DayKey {
        DayKey::new(Local::now().date_naive())
    }
}
