//! In-memory repository provider

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::domain::{
    BillingPeriod, CustomerCategory, DomainError, DomainResult, MeterProfile, MeterRepository,
    Reading, ReadingRepository, RepositoryProvider, ServiceType, TariffRecord, TariffRepository,
    TariffTier,
};

/// In-memory storage for development and testing
pub struct InMemoryRepositoryProvider {
    meters: DashMap<i32, MeterProfile>,
    tariffs: DashMap<i32, TariffRecord>,
    readings: DashMap<i32, Reading>,
    billing_periods: DashMap<i32, BillingPeriod>,
    reading_counter: AtomicI32,
    unavailable: AtomicBool,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            meters: DashMap::new(),
            tariffs: DashMap::new(),
            readings: DashMap::new(),
            billing_periods: DashMap::new(),
            reading_counter: AtomicI32::new(1),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn insert_meter(&self, profile: MeterProfile) {
        self.meters.insert(profile.meter_id, profile);
    }

    pub fn insert_tariff(&self, tariff: TariffRecord) {
        self.tariffs.insert(tariff.id, tariff);
    }

    pub fn insert_billing_period(&self, period: BillingPeriod) {
        self.billing_periods.insert(period.id, period);
    }

    /// Store a reading and return its assigned id.
    pub fn record_reading(
        &self,
        meter_id: i32,
        billing_period_id: i32,
        consumption_quantity: Decimal,
        reading_date: NaiveDate,
        is_approved: bool,
    ) -> i32 {
        let id = self.reading_counter.fetch_add(1, Ordering::SeqCst);
        self.readings.insert(
            id,
            Reading {
                id,
                meter_id,
                billing_period_id,
                consumption_quantity,
                reading_date,
                is_approved,
            },
        );
        id
    }

    /// Make every lookup fail with a storage error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> DomainResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::Storage("in-memory store unavailable".into()));
        }
        Ok(())
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn meters(&self) -> &dyn MeterRepository {
        self
    }

    fn tariffs(&self) -> &dyn TariffRepository {
        self
    }

    fn readings(&self) -> &dyn ReadingRepository {
        self
    }
}

#[async_trait]
impl MeterRepository for InMemoryRepositoryProvider {
    async fn find_profile(&self, meter_id: i32) -> DomainResult<Option<MeterProfile>> {
        self.check_available()?;
        Ok(self.meters.get(&meter_id).map(|m| m.clone()))
    }
}

#[async_trait]
impl TariffRepository for InMemoryRepositoryProvider {
    async fn find_meter_override(&self, tariff_id: i32) -> DomainResult<Option<TariffTier>> {
        self.check_available()?;
        let today = Self::today();
        Ok(self
            .tariffs
            .get(&tariff_id)
            .filter(|t| t.is_active_on(today))
            .map(|t| t.to_override_tier()))
    }

    async fn find_active_tiers(
        &self,
        service_type: ServiceType,
        customer_category: CustomerCategory,
    ) -> DomainResult<Vec<TariffTier>> {
        self.check_available()?;
        let today = Self::today();
        let mut tiers: Vec<TariffTier> = self
            .tariffs
            .iter()
            .filter(|t| {
                t.service_type == service_type
                    && t.customer_category == customer_category
                    && t.is_active_on(today)
            })
            .map(|t| t.to_tier())
            .collect();
        tiers.sort_by(|a, b| a.from_unit.cmp(&b.from_unit));
        Ok(tiers)
    }

    async fn find_base_charge(&self, tariff_id: i32) -> DomainResult<Option<Decimal>> {
        self.check_available()?;
        Ok(self.tariffs.get(&tariff_id).and_then(|t| t.fixed_charge))
    }
}

#[async_trait]
impl ReadingRepository for InMemoryRepositoryProvider {
    async fn find_approved_since(
        &self,
        meter_id: i32,
        date_from: NaiveDate,
        billing_period_id_upto: i32,
    ) -> DomainResult<Vec<Reading>> {
        self.check_available()?;
        let mut readings: Vec<Reading> = self
            .readings
            .iter()
            .filter(|r| {
                r.meter_id == meter_id
                    && r.is_approved
                    && r.reading_date >= date_from
                    && r.billing_period_id <= billing_period_id_upto
            })
            .map(|r| r.clone())
            .collect();
        readings.sort_by(|a, b| a.reading_date.cmp(&b.reading_date).then(a.id.cmp(&b.id)));
        Ok(readings)
    }

    async fn find_latest_approved(&self, meter_id: i32, limit: u64) -> DomainResult<Vec<Reading>> {
        self.check_available()?;
        let mut readings: Vec<Reading> = self
            .readings
            .iter()
            .filter(|r| r.meter_id == meter_id && r.is_approved)
            .map(|r| r.clone())
            .collect();
        readings.sort_by(|a, b| b.reading_date.cmp(&a.reading_date).then(b.id.cmp(&a.id)));
        readings.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(readings)
    }

    async fn find_billing_period(&self, id: i32) -> DomainResult<Option<BillingPeriod>> {
        self.check_available()?;
        Ok(self.billing_periods.get(&id).map(|p| p.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TariffKind;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn tariff(id: i32, from: Decimal, to: Option<Decimal>, price: Decimal) -> TariffRecord {
        TariffRecord {
            id,
            code: format!("T{}", id),
            name: format!("Tariff {}", id),
            kind: TariffKind::Standard,
            service_type: ServiceType::Electricity,
            customer_category: CustomerCategory::Residential,
            from_unit: from,
            to_unit: to,
            price_per_unit: price,
            fixed_charge: None,
            is_active: true,
            effective_from: None,
            effective_to: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn active_tiers_are_sorted_and_filtered() {
        let store = InMemoryRepositoryProvider::new();
        store.insert_tariff(tariff(2, dec!(101), None, dec!(0.15)));
        store.insert_tariff(tariff(1, dec!(0), Some(dec!(100)), dec!(0.10)));
        let mut expired = tariff(3, dec!(0), None, dec!(0.99));
        expired.effective_to = Some(Utc::now().date_naive() - Duration::days(1));
        store.insert_tariff(expired);
        let mut water = tariff(4, dec!(0), None, dec!(0.50));
        water.service_type = ServiceType::Water;
        store.insert_tariff(water);

        let tiers = store
            .find_active_tiers(ServiceType::Electricity, CustomerCategory::Residential)
            .await
            .unwrap();

        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0].tariff_id, Some(1));
        assert_eq!(tiers[1].tariff_id, Some(2));
    }

    #[tokio::test]
    async fn inactive_override_is_not_returned() {
        let store = InMemoryRepositoryProvider::new();
        let mut t = tariff(7, dec!(0), None, dec!(0.12));
        t.is_active = false;
        store.insert_tariff(t);

        assert!(store.find_meter_override(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn latest_approved_is_newest_first_and_limited() {
        let store = InMemoryRepositoryProvider::new();
        store.record_reading(1, 1, dec!(10), date(2026, 1, 31), true);
        store.record_reading(1, 2, dec!(20), date(2026, 2, 28), true);
        store.record_reading(1, 3, dec!(30), date(2026, 3, 31), false);
        store.record_reading(1, 4, dec!(40), date(2026, 4, 30), true);
        store.record_reading(2, 4, dec!(99), date(2026, 4, 30), true);

        let latest = store.find_latest_approved(1, 2).await.unwrap();

        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].consumption_quantity, dec!(40));
        assert_eq!(latest[1].consumption_quantity, dec!(20));
    }

    #[tokio::test]
    async fn unavailable_store_reports_storage_error() {
        let store = InMemoryRepositoryProvider::new();
        store.set_unavailable(true);

        let err = store.find_profile(1).await.unwrap_err();
        assert!(err.is_transient());
    }
}
