//! Reading & billing period repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{BillingPeriod, Reading};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Approved readings of a meter dated on or after `date_from` and
    /// belonging to billing periods up to `billing_period_id_upto`,
    /// ordered by reading date ascending.
    async fn find_approved_since(
        &self,
        meter_id: i32,
        date_from: NaiveDate,
        billing_period_id_upto: i32,
    ) -> DomainResult<Vec<Reading>>;

    /// The `limit` most recent approved readings, newest first.
    async fn find_latest_approved(&self, meter_id: i32, limit: u64) -> DomainResult<Vec<Reading>>;

    async fn find_billing_period(&self, id: i32) -> DomainResult<Option<BillingPeriod>>;
}
