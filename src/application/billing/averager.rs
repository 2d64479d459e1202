//! Rolling average of approved consumption

use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{DomainResult, Reading, ReadingRepository};

/// Average over the most recent approved readings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingAverage {
    pub average: Decimal,
    /// Readings actually found, at most the requested window
    pub readings_used: usize,
}

/// Mean consumption of the approved readings in `readings`; `0` when none.
pub fn average_consumption(readings: &[Reading]) -> RollingAverage {
    let approved: Vec<&Reading> = readings.iter().filter(|r| r.is_approved).collect();
    if approved.is_empty() {
        return RollingAverage {
            average: Decimal::ZERO,
            readings_used: 0,
        };
    }

    let total: Decimal = approved.iter().map(|r| r.consumption_quantity).sum();
    RollingAverage {
        average: total / Decimal::from(approved.len()),
        readings_used: approved.len(),
    }
}

pub struct ConsumptionAverager<'a> {
    readings: &'a dyn ReadingRepository,
}

impl<'a> ConsumptionAverager<'a> {
    pub fn new(readings: &'a dyn ReadingRepository) -> Self {
        Self { readings }
    }

    pub async fn rolling_average(&self, meter_id: i32, last_n: u32) -> DomainResult<RollingAverage> {
        if last_n == 0 {
            return Ok(average_consumption(&[]));
        }

        let readings = self
            .readings
            .find_latest_approved(meter_id, u64::from(last_n))
            .await?;
        let result = average_consumption(&readings);

        debug!(
            meter_id,
            last_n,
            readings_used = result.readings_used,
            average = %result.average,
            "Rolling average computed"
        );

        Ok(result)
    }

    pub async fn average_of(&self, meter_id: i32, last_n: u32) -> DomainResult<Decimal> {
        Ok(self.rolling_average(meter_id, last_n).await?.average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, 28).unwrap()
    }

    #[test]
    fn empty_input_averages_to_zero() {
        let avg = average_consumption(&[]);
        assert_eq!(avg.average, Decimal::ZERO);
        assert_eq!(avg.readings_used, 0);
    }

    #[tokio::test]
    async fn averages_last_n_approved_readings() {
        let store = InMemoryRepositoryProvider::new();
        store.record_reading(1, 1, dec!(500), date(1), true);
        store.record_reading(1, 2, dec!(100), date(2), true);
        store.record_reading(1, 3, dec!(200), date(3), true);
        store.record_reading(1, 4, dec!(999), date(4), false);
        store.record_reading(1, 5, dec!(300), date(5), true);

        let averager = ConsumptionAverager::new(&store);
        let avg = averager.rolling_average(1, 3).await.unwrap();

        assert_eq!(avg.readings_used, 3);
        assert_eq!(avg.average, dec!(200));
    }

    #[tokio::test]
    async fn divides_by_readings_actually_found() {
        let store = InMemoryRepositoryProvider::new();
        store.record_reading(1, 1, dec!(90), date(1), true);
        store.record_reading(1, 2, dec!(120), date(2), true);

        let averager = ConsumptionAverager::new(&store);
        let avg = averager.rolling_average(1, 6).await.unwrap();

        assert_eq!(avg.readings_used, 2);
        assert_eq!(avg.average, dec!(105));
    }

    #[tokio::test]
    async fn no_history_or_zero_window_yields_zero() {
        let store = InMemoryRepositoryProvider::new();
        store.record_reading(1, 1, dec!(90), date(1), true);

        let averager = ConsumptionAverager::new(&store);
        assert_eq!(averager.average_of(2, 3).await.unwrap(), Decimal::ZERO);
        assert_eq!(averager.average_of(1, 0).await.unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn storage_failure_is_propagated() {
        let store = InMemoryRepositoryProvider::new();
        store.set_unavailable(true);

        let averager = ConsumptionAverager::new(&store);
        assert!(averager.average_of(1, 3).await.is_err());
    }
}
