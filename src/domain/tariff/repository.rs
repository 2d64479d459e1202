//! Tariff repository interface

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::model::TariffTier;
use crate::domain::meter::{CustomerCategory, ServiceType};
use crate::domain::DomainResult;

#[async_trait]
pub trait TariffRepository: Send + Sync {
    /// The tariff assigned to a meter, as a single unbounded tier.
    ///
    /// `None` when the tariff does not exist or is not active today.
    async fn find_meter_override(&self, tariff_id: i32) -> DomainResult<Option<TariffTier>>;

    /// Active brackets for a service type and customer category,
    /// ordered by `from_unit` ascending.
    async fn find_active_tiers(
        &self,
        service_type: ServiceType,
        customer_category: CustomerCategory,
    ) -> DomainResult<Vec<TariffTier>>;

    /// Fixed charge of a tariff; `None` when the tariff is missing or has no
    /// fixed charge configured.
    async fn find_base_charge(&self, tariff_id: i32) -> DomainResult<Option<Decimal>>;
}
