//! Tariff resolution for a meter

use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{DomainResult, MeterProfile, TariffRepository, TariffSelection};

pub struct TariffResolver<'a> {
    tariffs: &'a dyn TariffRepository,
    default_rate: Decimal,
}

impl<'a> TariffResolver<'a> {
    pub fn new(tariffs: &'a dyn TariffRepository, default_rate: Decimal) -> Self {
        Self {
            tariffs,
            default_rate,
        }
    }

    /// Meter override if still active, else the category schedule, else the
    /// synthetic fallback tier.
    pub async fn resolve(&self, meter: &MeterProfile) -> DomainResult<TariffSelection> {
        if let Some(tariff_id) = meter.tariff_override_id {
            match self.tariffs.find_meter_override(tariff_id).await? {
                Some(tier) => {
                    debug!(meter_id = meter.meter_id, tariff_id, "Using meter tariff override");
                    return Ok(TariffSelection::meter_override(tariff_id, tier));
                }
                None => debug!(
                    meter_id = meter.meter_id,
                    tariff_id, "Meter tariff override inactive or missing, ignoring"
                ),
            }
        }

        let tiers = self
            .tariffs
            .find_active_tiers(meter.service_type, meter.customer_category)
            .await?;

        if !tiers.is_empty() {
            debug!(
                meter_id = meter.meter_id,
                service_type = %meter.service_type,
                customer_category = %meter.customer_category,
                tiers = tiers.len(),
                "Using category tariff schedule"
            );
            return Ok(TariffSelection::schedule(tiers));
        }

        debug!(
            meter_id = meter.meter_id,
            default_rate = %self.default_rate,
            "No tariff configured, using default rate"
        );
        Ok(TariffSelection::fallback(self.default_rate))
    }
}
