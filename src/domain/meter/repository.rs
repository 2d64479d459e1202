//! Meter repository interface

use async_trait::async_trait;

use super::model::MeterProfile;
use crate::domain::DomainResult;

#[async_trait]
pub trait MeterRepository: Send + Sync {
    /// Meter joined with its customer's category.
    ///
    /// `None` when the meter does not exist or has no customer attached.
    async fn find_profile(&self, meter_id: i32) -> DomainResult<Option<MeterProfile>>;
}
