//! SeaORM implementation of ReadingRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use super::db_err;
use crate::domain::reading::{BillingPeriod, Reading, ReadingRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{billing_period, meter_reading};

fn reading_to_domain(r: meter_reading::Model) -> Reading {
    Reading {
        id: r.id,
        meter_id: r.meter_id,
        billing_period_id: r.billing_period_id,
        consumption_quantity: r.consumption,
        reading_date: r.reading_date,
        is_approved: r.status == meter_reading::ReadingStatus::Approved,
    }
}

fn period_to_domain(p: billing_period::Model) -> BillingPeriod {
    BillingPeriod {
        id: p.id,
        name: p.name,
        start_date: p.start_date,
        end_date: p.end_date,
    }
}

pub struct SeaOrmReadingRepository {
    db: DatabaseConnection,
}

impl SeaOrmReadingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReadingRepository for SeaOrmReadingRepository {
    async fn find_approved_since(
        &self,
        meter_id: i32,
        date_from: NaiveDate,
        billing_period_id_upto: i32,
    ) -> DomainResult<Vec<Reading>> {
        let models = meter_reading::Entity::find()
            .filter(meter_reading::Column::MeterId.eq(meter_id))
            .filter(meter_reading::Column::Status.eq(meter_reading::ReadingStatus::Approved))
            .filter(meter_reading::Column::ReadingDate.gte(date_from))
            .filter(meter_reading::Column::BillingPeriodId.lte(billing_period_id_upto))
            .order_by_asc(meter_reading::Column::ReadingDate)
            .order_by_asc(meter_reading::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(reading_to_domain).collect())
    }

    async fn find_latest_approved(&self, meter_id: i32, limit: u64) -> DomainResult<Vec<Reading>> {
        let models = meter_reading::Entity::find()
            .filter(meter_reading::Column::MeterId.eq(meter_id))
            .filter(meter_reading::Column::Status.eq(meter_reading::ReadingStatus::Approved))
            .order_by_desc(meter_reading::Column::ReadingDate)
            .order_by_desc(meter_reading::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(reading_to_domain).collect())
    }

    async fn find_billing_period(&self, id: i32) -> DomainResult<Option<BillingPeriod>> {
        let model = billing_period::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(period_to_domain))
    }
}
