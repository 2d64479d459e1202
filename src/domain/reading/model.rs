//! Meter reading and billing period entities

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

/// Consumption recorded for one meter in one billing period
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub id: i32,
    pub meter_id: i32,
    pub billing_period_id: i32,
    /// Units consumed since the previous reading
    pub consumption_quantity: Decimal,
    pub reading_date: NaiveDate,
    /// Only approved readings count towards cumulative and average figures
    pub is_approved: bool,
}

/// Billing cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingPeriod {
    pub id: i32,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl BillingPeriod {
    /// First day of the accounting year the period starts in.
    pub fn year_start(&self) -> NaiveDate {
        NaiveDate::from_yo_opt(self.start_date.year(), 1).unwrap_or(self.start_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_start_is_first_of_january() {
        let period = BillingPeriod {
            id: 5,
            name: "2026-05".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 5, 31).unwrap(),
        };
        assert_eq!(
            period.year_start(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
    }

    #[test]
    fn period_crossing_new_year_uses_start_year() {
        let period = BillingPeriod {
            id: 12,
            name: "2025-12".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(),
        };
        assert_eq!(
            period.year_start(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }
}
