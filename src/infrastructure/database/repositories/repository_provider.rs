//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::meter::MeterRepository;
use crate::domain::reading::ReadingRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::tariff::TariffRepository;

use super::meter_repository::SeaOrmMeterRepository;
use super::reading_repository::SeaOrmReadingRepository;
use super::tariff_repository::SeaOrmTariffRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let meter = repos.meters().find_profile(42).await?;
/// let tiers = repos.tariffs().find_active_tiers(ServiceType::Water, CustomerCategory::Commercial).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    meters: SeaOrmMeterRepository,
    tariffs: SeaOrmTariffRepository,
    readings: SeaOrmReadingRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            meters: SeaOrmMeterRepository::new(db.clone()),
            tariffs: SeaOrmTariffRepository::new(db.clone()),
            readings: SeaOrmReadingRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn meters(&self) -> &dyn MeterRepository {
        &self.meters
    }

    fn tariffs(&self) -> &dyn TariffRepository {
        &self.tariffs
    }

    fn readings(&self) -> &dyn ReadingRepository {
        &self.readings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomerCategory, ServiceType};
    use crate::infrastructure::database::entities::{
        billing_period, customer, meter, meter_reading, tariff,
    };
    use crate::infrastructure::database::migrator::Migrator;
    use chrono::{Duration, NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use sea_orm::{ActiveModelTrait, Database, Set};
    use sea_orm_migration::MigratorTrait;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup() -> (DatabaseConnection, SeaOrmRepositoryProvider) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let repos = SeaOrmRepositoryProvider::new(db.clone());
        (db, repos)
    }

    async fn insert_meter(
        db: &DatabaseConnection,
        serial: &str,
        customer_id: Option<i32>,
        tariff_id: Option<i32>,
    ) -> i32 {
        meter::ActiveModel {
            serial_number: Set(serial.to_string()),
            customer_id: Set(customer_id),
            service_type: Set(None),
            tariff_id: Set(tariff_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
        .id
    }

    async fn insert_reading(
        db: &DatabaseConnection,
        meter_id: i32,
        billing_period_id: i32,
        consumption: rust_decimal::Decimal,
        reading_date: NaiveDate,
        status: meter_reading::ReadingStatus,
    ) {
        meter_reading::ActiveModel {
            meter_id: Set(meter_id),
            billing_period_id: Set(billing_period_id),
            previous_value: Set(dec!(0)),
            current_value: Set(consumption),
            consumption: Set(consumption),
            reading_date: Set(reading_date),
            status: Set(status),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn seeded_schedule_is_returned_in_order() {
        let (_db, repos) = setup().await;

        let tiers = repos
            .tariffs()
            .find_active_tiers(ServiceType::Electricity, CustomerCategory::Residential)
            .await
            .unwrap();

        assert_eq!(tiers.len(), 3);
        assert_eq!(tiers[0].price_per_unit, dec!(0.10));
        assert_eq!(tiers[1].from_unit, dec!(101));
        assert!(tiers[2].is_open_ended());

        let base = repos
            .tariffs()
            .find_base_charge(tiers[0].tariff_id.unwrap())
            .await
            .unwrap();
        assert_eq!(base, Some(dec!(5.00)));
    }

    #[tokio::test]
    async fn expired_tariff_is_excluded() {
        let (db, repos) = setup().await;
        let now = Utc::now();
        let expired = tariff::ActiveModel {
            code: Set("WAT-OLD".into()),
            name: Set("Old water".into()),
            tariff_type: Set(tariff::TariffType::Standard),
            service_type: Set("water".into()),
            customer_category: Set("residential".into()),
            from_unit: Set(dec!(0)),
            to_unit: Set(None),
            price_per_unit: Set(dec!(0.5)),
            fixed_charge: Set(None),
            is_active: Set(true),
            effective_from: Set(None),
            effective_to: Set(Some(now.date_naive() - Duration::days(1))),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let tiers = repos
            .tariffs()
            .find_active_tiers(ServiceType::Water, CustomerCategory::Residential)
            .await
            .unwrap();
        assert!(tiers.is_empty());
        assert!(repos
            .tariffs()
            .find_meter_override(expired.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn meter_profile_defaults_and_requires_customer() {
        let (db, repos) = setup().await;
        let customer = customer::ActiveModel {
            name: Set("Jane Roe".into()),
            category: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let billed = insert_meter(&db, "M-001", Some(customer.id), Some(2)).await;
        let orphan = insert_meter(&db, "M-002", None, None).await;

        let profile = repos.meters().find_profile(billed).await.unwrap().unwrap();
        assert_eq!(profile.customer_id, customer.id);
        assert_eq!(profile.customer_category, CustomerCategory::Residential);
        assert_eq!(profile.service_type, ServiceType::Electricity);
        assert_eq!(profile.tariff_override_id, Some(2));

        assert!(repos.meters().find_profile(orphan).await.unwrap().is_none());
        assert!(repos.meters().find_profile(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn readings_are_filtered_by_status_date_and_period() {
        let (db, repos) = setup().await;
        let meter_id = insert_meter(&db, "M-010", None, None).await;
        for (name, start, end) in [
            ("2025-12", date(2025, 12, 1), date(2025, 12, 31)),
            ("2026-01", date(2026, 1, 1), date(2026, 1, 31)),
            ("2026-02", date(2026, 2, 1), date(2026, 2, 28)),
        ] {
            billing_period::ActiveModel {
                name: Set(name.into()),
                start_date: Set(start),
                end_date: Set(end),
                ..Default::default()
            }
            .insert(&db)
            .await
            .unwrap();
        }

        use meter_reading::ReadingStatus::*;
        insert_reading(&db, meter_id, 1, dec!(400), date(2025, 12, 31), Approved).await;
        insert_reading(&db, meter_id, 2, dec!(60), date(2026, 1, 31), Approved).await;
        insert_reading(&db, meter_id, 2, dec!(999), date(2026, 1, 31), Rejected).await;
        insert_reading(&db, meter_id, 3, dec!(30), date(2026, 2, 28), Approved).await;

        let since = repos
            .readings()
            .find_approved_since(meter_id, date(2026, 1, 1), 2)
            .await
            .unwrap();
        assert_eq!(since.len(), 1);
        assert_eq!(since[0].consumption_quantity, dec!(60));

        let latest = repos
            .readings()
            .find_latest_approved(meter_id, 2)
            .await
            .unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].consumption_quantity, dec!(30));
        assert!(latest.iter().all(|r| r.is_approved));

        let period = repos.readings().find_billing_period(3).await.unwrap().unwrap();
        assert_eq!(period.year_start(), date(2026, 1, 1));
    }
}
