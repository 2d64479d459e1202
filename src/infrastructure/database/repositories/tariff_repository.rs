//! SeaORM implementation of TariffRepository

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::db_err;
use super::meter_repository::{parse_category, parse_service_type};
use crate::domain::meter::{CustomerCategory, ServiceType};
use crate::domain::tariff::{TariffKind, TariffRecord, TariffRepository, TariffTier};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::tariff;

// ── Conversion helpers ──────────────────────────────────────────

fn entity_to_domain(t: tariff::Model) -> TariffRecord {
    TariffRecord {
        id: t.id,
        code: t.code,
        name: t.name,
        kind: match t.tariff_type {
            tariff::TariffType::Standard => TariffKind::Standard,
            tariff::TariffType::Custom => TariffKind::Custom,
            tariff::TariffType::Promotional => TariffKind::Promotional,
            tariff::TariffType::Contract => TariffKind::Contract,
        },
        service_type: parse_service_type(Some(&t.service_type)),
        customer_category: parse_category(Some(&t.customer_category)),
        from_unit: t.from_unit,
        to_unit: t.to_unit,
        price_per_unit: t.price_per_unit,
        fixed_charge: t.fixed_charge,
        is_active: t.is_active,
        effective_from: t.effective_from,
        effective_to: t.effective_to,
    }
}

/// Active flag set and `today` inside the effective window.
fn active_on(today: NaiveDate) -> Condition {
    Condition::all()
        .add(tariff::Column::IsActive.eq(true))
        .add(
            Condition::any()
                .add(tariff::Column::EffectiveFrom.is_null())
                .add(tariff::Column::EffectiveFrom.lte(today)),
        )
        .add(
            Condition::any()
                .add(tariff::Column::EffectiveTo.is_null())
                .add(tariff::Column::EffectiveTo.gte(today)),
        )
}

// ── SeaOrmTariffRepository ──────────────────────────────────────

pub struct SeaOrmTariffRepository {
    db: DatabaseConnection,
}

impl SeaOrmTariffRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

#[async_trait]
impl TariffRepository for SeaOrmTariffRepository {
    async fn find_meter_override(&self, tariff_id: i32) -> DomainResult<Option<TariffTier>> {
        let model = tariff::Entity::find_by_id(tariff_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let today = Self::today();
        Ok(model
            .map(entity_to_domain)
            .filter(|t| t.is_active_on(today))
            .map(|t| t.to_override_tier()))
    }

    async fn find_active_tiers(
        &self,
        service_type: ServiceType,
        customer_category: CustomerCategory,
    ) -> DomainResult<Vec<TariffTier>> {
        let models = tariff::Entity::find()
            .filter(tariff::Column::ServiceType.eq(service_type.as_str()))
            .filter(tariff::Column::CustomerCategory.eq(customer_category.as_str()))
            .filter(active_on(Self::today()))
            .order_by_asc(tariff::Column::FromUnit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut tiers: Vec<TariffTier> = models
            .into_iter()
            .map(entity_to_domain)
            .map(|t| t.to_tier())
            .collect();
        // SQLite may order decimal columns as text
        tiers.sort_by(|a, b| a.from_unit.cmp(&b.from_unit));
        Ok(tiers)
    }

    async fn find_base_charge(&self, tariff_id: i32) -> DomainResult<Option<Decimal>> {
        let model = tariff::Entity::find_by_id(tariff_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.and_then(|t| t.fixed_charge))
    }
}
