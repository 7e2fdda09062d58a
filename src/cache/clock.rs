//! Calendar source for the staleness guard
//!
//! Only the date matters: a feed is refreshed at most once per calendar day.

use chrono::{FixedOffset, Local, NaiveDate, Utc};
use std::sync::{Mutex, PoisonError};

/// Source of "today"
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, in local time or at a fixed UTC offset
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    /// Use the machine's local time zone
    pub fn local() -> Self {
        Self { offset: None }
    }

    /// Use a fixed UTC offset regardless of the machine's time zone
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            offset: Some(offset),
        }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
            None => Local::now().date_naive(),
        }
    }
}

/// Clock whose date only changes when told to
#[derive(Debug)]
pub struct ManualClock {
    today: Mutex<NaiveDate>,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner) = date;
    }

    /// Move forward by `days` calendar days
    pub fn advance_days(&self, days: u64) {
        let mut today = self.today.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(next) = today.checked_add_days(chrono::Days::new(days)) {
            *today = next;
        }
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        clock.advance_days(1);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        clock.set(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_fixed_offset_clock_is_near_utc_date() {
        let jst = SystemClock::with_offset(FixedOffset::east_opt(9 * 3600).unwrap());
        let utc_today = Utc::now().date_naive();
        let diff = (jst.today() - utc_today).num_days();
        assert!((0..=1).contains(&diff));
    }
}
