//! Date range bounds for filtering transactions
//!
//! All day boundaries are computed in UTC.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::models::Transaction;

/// First instant of a calendar day (00:00:00.000 UTC)
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last millisecond of a calendar day (23:59:59.999 UTC)
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date)
        .checked_add_signed(Duration::days(1))
        .map(|next| next - Duration::milliseconds(1))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Inclusive instant bounds derived from optional calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DateBounds {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateBounds {
    /// Build bounds from `dateFrom` / `dateTo`
    pub fn new(date_from: Option<NaiveDate>, date_to: Option<NaiveDate>) -> Self {
        Self {
            from: date_from.map(start_of_day),
            to: date_to.map(end_of_day),
        }
    }

    /// No bound is set
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Check a parsed timestamp against the bounds.
    ///
    /// An unparseable timestamp (`None`) only passes when no bound is active.
    pub fn contains(&self, at: Option<DateTime<Utc>>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(at) = at else {
            return false;
        };
        let after_start = self.from.map_or(true, |from| at >= from);
        let before_end = self.to.map_or(true, |to| at <= to);
        after_start && before_end
    }
}

/// Time filtering trait
pub trait TimeFilter {
    /// Check whether the item falls inside the bounds
    fn filter_by_time(&self, bounds: &DateBounds) -> bool;
}

impl TimeFilter for Transaction {
    fn filter_by_time(&self, bounds: &DateBounds) -> bool {
        bounds.contains(self.timestamp_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionStatus;
    use chrono::{TimeZone, Timelike};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx_at(timestamp: &str) -> Transaction {
        Transaction {
            id: "t".to_string(),
            hash: "0x1".to_string(),
            from_address: "0xa".to_string(),
            to_address: "0xb".to_string(),
            amount: "1".to_string(),
            status: TransactionStatus::Confirmed,
            gas_limit: None,
            gas_price: None,
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn test_day_bounds() {
        let d = date(2024, 3, 10);
        assert_eq!(start_of_day(d), Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap());
        let end = end_of_day(d);
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
        assert_eq!(end.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn test_unbounded_accepts_unparseable() {
        let bounds = DateBounds::default();
        assert!(tx_at("not a timestamp").filter_by_time(&bounds));
    }

    #[test]
    fn test_bounds_exclude_unparseable() {
        let bounds = DateBounds::new(Some(date(2024, 1, 1)), None);
        assert!(!tx_at("not a timestamp").filter_by_time(&bounds));
        let bounds = DateBounds::new(None, Some(date(2024, 1, 1)));
        assert!(!tx_at("").filter_by_time(&bounds));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = DateBounds::new(Some(date(2024, 1, 1)), Some(date(2024, 1, 31)));
        assert!(tx_at("2024-01-01T00:00:00Z").filter_by_time(&bounds));
        assert!(tx_at("2024-01-31T23:59:59.999Z").filter_by_time(&bounds));
        assert!(!tx_at("2024-02-01T00:00:00Z").filter_by_time(&bounds));
        assert!(!tx_at("2023-12-31T23:59:59.999Z").filter_by_time(&bounds));
    }
}
