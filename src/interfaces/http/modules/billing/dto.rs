//! Billing DTOs
//!
//! Monetary values and quantities are serialised as decimal strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::application::billing::RollingAverage;
use crate::domain::{
    BillingWarning, CalculationOptions, ConsumptionBreakdownLine, ConsumptionResult,
    TariffSelection, TariffSource, TariffTier,
};
use crate::shared::money::format_money;

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    Ok(())
}

fn quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

// ── Requests ────────────────────────────────────────────────────

/// Calculate charges for a known consumption
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CalculateConsumptionRequest {
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = String, example = "250")]
    pub consumption: Decimal,
    pub billing_period_id: Option<i32>,
    /// Apply tier boundaries to year-to-date consumption
    #[serde(default)]
    pub use_cumulative: bool,
}

impl CalculateConsumptionRequest {
    pub fn options(&self) -> CalculationOptions {
        CalculationOptions {
            billing_period_id: self.billing_period_id,
            use_cumulative: self.use_cumulative,
        }
    }
}

/// Calculate charges from two register values
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterReadingRequest {
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = String, example = "12000")]
    pub previous_value: Decimal,
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = String, example = "12250")]
    pub current_value: Decimal,
    pub billing_period_id: Option<i32>,
    #[serde(default)]
    pub use_cumulative: bool,
}

impl RegisterReadingRequest {
    pub fn options(&self) -> CalculationOptions {
        CalculationOptions {
            billing_period_id: self.billing_period_id,
            use_cumulative: self.use_cumulative,
        }
    }
}

/// Bill an estimate based on recent approved readings
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct EstimateConsumptionRequest {
    /// Readings to average, defaults to the configured window
    #[validate(range(min = 1, max = 24))]
    pub last_n: Option<u32>,
    pub billing_period_id: Option<i32>,
    #[serde(default)]
    pub use_cumulative: bool,
}

impl EstimateConsumptionRequest {
    pub fn options(&self) -> CalculationOptions {
        CalculationOptions {
            billing_period_id: self.billing_period_id,
            use_cumulative: self.use_cumulative,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AverageQuery {
    /// Readings to average, defaults to the configured window
    pub last_n: Option<u32>,
}

// ── Responses ───────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BreakdownLineResponse {
    pub tier_label: String,
    pub units_in_tier: String,
    pub rate: String,
    pub amount: String,
    pub overflow: bool,
}

impl From<&ConsumptionBreakdownLine> for BreakdownLineResponse {
    fn from(line: &ConsumptionBreakdownLine) -> Self {
        Self {
            tier_label: line.tier_label.clone(),
            units_in_tier: quantity(line.units_in_tier),
            rate: quantity(line.rate),
            amount: format_money(line.amount),
            overflow: line.overflow,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WarningResponse {
    /// Stable identifier, e.g. `zero_consumption`
    pub kind: String,
    pub message: String,
}

impl From<&BillingWarning> for WarningResponse {
    fn from(w: &BillingWarning) -> Self {
        Self {
            kind: w.kind().to_string(),
            message: w.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConsumptionResultResponse {
    pub meter_id: i32,
    pub consumption: String,
    pub consumption_amount: String,
    pub base_charge: String,
    pub total_before_fees: String,
    pub currency: String,
    pub cumulative_offset: String,
    /// `meter_override`, `schedule` or `fallback`
    pub tariff_source: String,
    pub tariff_id: Option<i32>,
    pub breakdown: Vec<BreakdownLineResponse>,
    pub warnings: Vec<WarningResponse>,
}

impl ConsumptionResultResponse {
    pub fn new(result: &ConsumptionResult, currency: &str) -> Self {
        let tariff_id = match result.tariff_source {
            TariffSource::MeterOverride { tariff_id } => Some(tariff_id),
            _ => None,
        };

        Self {
            meter_id: result.meter_id,
            consumption: quantity(result.consumption),
            consumption_amount: format_money(result.consumption_amount),
            base_charge: format_money(result.base_charge),
            total_before_fees: format_money(result.total_before_fees),
            currency: currency.to_string(),
            cumulative_offset: quantity(result.cumulative_offset),
            tariff_source: result.tariff_source.to_string(),
            tariff_id,
            breakdown: result.breakdown.iter().map(Into::into).collect(),
            warnings: result.warnings.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AverageConsumptionResponse {
    pub meter_id: i32,
    pub average: String,
    pub readings_used: usize,
    pub window: u32,
}

impl AverageConsumptionResponse {
    pub fn new(meter_id: i32, window: u32, avg: RollingAverage) -> Self {
        Self {
            meter_id,
            average: format_money(avg.average),
            readings_used: avg.readings_used,
            window,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TariffTierResponse {
    pub label: String,
    pub from_unit: String,
    /// `null` for an open-ended tier
    pub to_unit: Option<String>,
    pub price_per_unit: String,
    pub tariff_id: Option<i32>,
}

impl From<&TariffTier> for TariffTierResponse {
    fn from(t: &TariffTier) -> Self {
        Self {
            label: t.label.clone(),
            from_unit: quantity(t.from_unit),
            to_unit: t.to_unit.map(quantity),
            price_per_unit: quantity(t.price_per_unit),
            tariff_id: t.tariff_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TariffSelectionResponse {
    pub meter_id: i32,
    pub source: String,
    /// Tariff whose fixed charge applies
    pub base_tariff_id: Option<i32>,
    pub tiers: Vec<TariffTierResponse>,
}

impl TariffSelectionResponse {
    pub fn new(meter_id: i32, selection: &TariffSelection) -> Self {
        Self {
            meter_id,
            source: selection.source().to_string(),
            base_tariff_id: selection.base_tariff_id(),
            tiers: selection.tiers().iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn negative_consumption_fails_validation() {
        let req = CalculateConsumptionRequest {
            consumption: dec!(-0.5),
            billing_period_id: None,
            use_cumulative: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn estimate_window_is_bounded() {
        let req = EstimateConsumptionRequest {
            last_n: Some(0),
            ..Default::default()
        };
        assert!(req.validate().is_err());
        assert!(EstimateConsumptionRequest::default().validate().is_ok());
    }

    #[test]
    fn breakdown_line_shows_rounded_amount() {
        let line = ConsumptionBreakdownLine::new("0-100", dec!(33.333), dec!(0.155));
        let dto = BreakdownLineResponse::from(&line);
        assert_eq!(dto.amount, "5.17");
        assert_eq!(dto.units_in_tier, "33.333");
        assert_eq!(dto.rate, "0.155");
    }

    #[test]
    fn open_tier_has_no_upper_bound() {
        let dto = TariffTierResponse::from(&TariffTier::unbounded(dec!(0.18), "default"));
        assert_eq!(dto.to_unit, None);
        assert_eq!(dto.from_unit, "0");
    }
}
