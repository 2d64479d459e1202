//! Year-to-date consumption for cumulative tariffs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::{BillingWarning, DomainResult, ReadingRepository};

/// Units already billed this accounting year
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeOffset {
    pub units: Decimal,
    pub warning: Option<BillingWarning>,
}

impl CumulativeOffset {
    pub fn none() -> Self {
        Self {
            units: Decimal::ZERO,
            warning: None,
        }
    }
}

pub struct CumulativeAggregator<'a> {
    readings: &'a dyn ReadingRepository,
}

impl<'a> CumulativeAggregator<'a> {
    pub fn new(readings: &'a dyn ReadingRepository) -> Self {
        Self { readings }
    }

    /// Sum of approved consumption dated on or after `year_start` in billing
    /// periods up to and including `upto_billing_period_id`.
    pub async fn cumulative_since(
        &self,
        meter_id: i32,
        year_start: NaiveDate,
        upto_billing_period_id: i32,
    ) -> DomainResult<Decimal> {
        let readings = self
            .readings
            .find_approved_since(meter_id, year_start, upto_billing_period_id)
            .await?;

        Ok(readings
            .iter()
            .filter(|r| r.is_approved)
            .map(|r| r.consumption_quantity)
            .sum())
    }

    /// Offset to apply when billing `billing_period_id`: everything approved
    /// earlier in the same year, excluding the period itself.
    pub async fn offset_for(
        &self,
        meter_id: i32,
        billing_period_id: i32,
    ) -> DomainResult<CumulativeOffset> {
        let Some(period) = self.readings.find_billing_period(billing_period_id).await? else {
            warn!(meter_id, billing_period_id, "Billing period not found, no cumulative offset");
            return Ok(CumulativeOffset {
                units: Decimal::ZERO,
                warning: Some(BillingWarning::BillingPeriodNotFound { billing_period_id }),
            });
        };

        let readings = self
            .readings
            .find_approved_since(meter_id, period.year_start(), billing_period_id)
            .await?;

        let units: Decimal = readings
            .iter()
            .filter(|r| r.is_approved && r.billing_period_id != billing_period_id)
            .map(|r| r.consumption_quantity)
            .sum();

        debug!(
            meter_id,
            billing_period_id,
            year_start = %period.year_start(),
            units = %units,
            "Cumulative offset computed"
        );

        Ok(CumulativeOffset {
            units,
            warning: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BillingPeriod;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store() -> InMemoryRepositoryProvider {
        let store = InMemoryRepositoryProvider::new();
        store.insert_billing_period(BillingPeriod {
            id: 14,
            name: "2026-02".into(),
            start_date: date(2026, 2, 1),
            end_date: date(2026, 2, 28),
        });
        store.insert_billing_period(BillingPeriod {
            id: 15,
            name: "2026-03".into(),
            start_date: date(2026, 3, 1),
            end_date: date(2026, 3, 31),
        });
        // Previous year, must be ignored
        store.record_reading(1, 12, dec!(400), date(2025, 12, 31), true);
        store.record_reading(1, 13, dec!(60), date(2026, 1, 31), true);
        store.record_reading(1, 14, dec!(30), date(2026, 2, 28), true);
        store.record_reading(1, 14, dec!(500), date(2026, 2, 28), false);
        store.record_reading(1, 15, dec!(70), date(2026, 3, 31), true);
        store
    }

    #[tokio::test]
    async fn cumulative_since_includes_upto_period() {
        let store = store();
        let agg = CumulativeAggregator::new(&store);

        let total = agg.cumulative_since(1, date(2026, 1, 1), 14).await.unwrap();
        assert_eq!(total, dec!(90));
    }

    #[tokio::test]
    async fn cumulative_since_without_readings_is_zero() {
        let store = store();
        let agg = CumulativeAggregator::new(&store);

        let total = agg.cumulative_since(9, date(2026, 1, 1), 15).await.unwrap();
        assert_eq!(total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn offset_excludes_period_being_billed() {
        let store = store();
        let agg = CumulativeAggregator::new(&store);

        let offset = agg.offset_for(1, 15).await.unwrap();
        assert_eq!(offset.units, dec!(90));
        assert!(offset.warning.is_none());
    }

    #[tokio::test]
    async fn missing_period_degrades_to_zero_with_warning() {
        let store = store();
        let agg = CumulativeAggregator::new(&store);

        let offset = agg.offset_for(1, 99).await.unwrap();
        assert_eq!(offset.units, Decimal::ZERO);
        assert_eq!(
            offset.warning,
            Some(BillingWarning::BillingPeriodNotFound {
                billing_period_id: 99
            })
        );
    }

    #[tokio::test]
    async fn storage_failure_is_propagated() {
        let store = store();
        store.set_unavailable(true);
        let agg = CumulativeAggregator::new(&store);

        assert!(agg.offset_for(1, 15).await.is_err());
    }
}
