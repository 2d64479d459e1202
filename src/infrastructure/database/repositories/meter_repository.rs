//! SeaORM implementation of MeterRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::debug;

use super::db_err;
use crate::domain::meter::{CustomerCategory, MeterProfile, MeterRepository, ServiceType};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{customer, meter};

pub struct SeaOrmMeterRepository {
    db: DatabaseConnection,
}

impl SeaOrmMeterRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn parse_service_type(value: Option<&str>) -> ServiceType {
    value.and_then(|s| s.parse().ok()).unwrap_or_default()
}

pub(super) fn parse_category(value: Option<&str>) -> CustomerCategory {
    value.and_then(|s| s.parse().ok()).unwrap_or_default()
}

fn to_profile(m: meter::Model, c: customer::Model) -> MeterProfile {
    let mut profile = MeterProfile::new(
        m.id,
        c.id,
        parse_category(c.category.as_deref()),
        parse_service_type(m.service_type.as_deref()),
    );
    profile.tariff_override_id = m.tariff_id;
    profile
}

#[async_trait]
impl MeterRepository for SeaOrmMeterRepository {
    async fn find_profile(&self, meter_id: i32) -> DomainResult<Option<MeterProfile>> {
        let row = meter::Entity::find_by_id(meter_id)
            .find_also_related(customer::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match row {
            Some((m, Some(c))) => Ok(Some(to_profile(m, c))),
            Some((m, None)) => {
                debug!(meter_id = m.id, "Meter has no customer attached");
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
