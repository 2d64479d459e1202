//! Billing engine facade
//!
//! Orchestrates tariff resolution, the cumulative offset and tier
//! allocation into one consumption calculation, then attaches the base
//! charge and advisory warnings.

use std::sync::Arc;
use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use super::allocator::allocate;
use super::averager::{ConsumptionAverager, RollingAverage};
use super::cumulative::{CumulativeAggregator, CumulativeOffset};
use super::resolver::TariffResolver;
use crate::config::BillingConfig;
use crate::domain::{
    BillingWarning, CalculationOptions, ConsumptionResult, DomainError, DomainResult,
    MeterProfile, RepositoryProvider, TariffSelection,
};
use crate::shared::money::round_money;

/// Service for consumption billing calculations
pub struct BillingEngine {
    repos: Arc<dyn RepositoryProvider>,
    config: BillingConfig,
}

impl BillingEngine {
    pub fn new(repos: Arc<dyn RepositoryProvider>, config: BillingConfig) -> Self {
        Self { repos, config }
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    async fn load_meter(&self, meter_id: i32) -> DomainResult<MeterProfile> {
        self.repos
            .meters()
            .find_profile(meter_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Meter", "id", meter_id))
    }

    /// Tariff structure that would apply to the meter right now.
    pub async fn resolve_tariff(&self, meter_id: i32) -> DomainResult<TariffSelection> {
        let meter = self.load_meter(meter_id).await?;
        TariffResolver::new(self.repos.tariffs(), self.config.default_rate)
            .resolve(&meter)
            .await
    }

    #[instrument(skip(self, options), fields(cumulative = options.use_cumulative))]
    pub async fn calculate_consumption(
        &self,
        meter_id: i32,
        consumption: Decimal,
        options: CalculationOptions,
    ) -> DomainResult<ConsumptionResult> {
        if consumption < Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "Consumption must not be negative, got {}",
                consumption
            )));
        }

        let started = Instant::now();
        let meter = self.load_meter(meter_id).await?;

        let resolver = TariffResolver::new(self.repos.tariffs(), self.config.default_rate);
        let aggregator = CumulativeAggregator::new(self.repos.readings());
        let (selection, offset) = tokio::join!(resolver.resolve(&meter), async {
            match options.cumulative_period() {
                Some(billing_period_id) => aggregator.offset_for(meter_id, billing_period_id).await,
                None => Ok(CumulativeOffset::none()),
            }
        });
        let selection = selection?;
        let offset = offset?;

        let allocation = allocate(consumption, selection.tiers(), offset.units);

        let mut warnings = Vec::new();
        if selection.is_fallback() {
            warnings.push(BillingWarning::NoMatchingTariff {
                default_rate: self.config.default_rate,
            });
        }
        if let Some(warning) = offset.warning {
            warnings.push(warning);
        }
        if allocation.overflow_units > Decimal::ZERO {
            let rate = selection
                .tiers()
                .last()
                .map(|t| t.price_per_unit)
                .unwrap_or_default();
            warnings.push(BillingWarning::TierOverflow {
                units: allocation.overflow_units,
                rate,
            });
        }
        if allocation.unbilled_units > Decimal::ZERO {
            warn!(
                meter_id,
                units = %allocation.unbilled_units,
                "Tariff selection has no tiers, units left unbilled"
            );
        }

        let base_charge = match selection.base_tariff_id() {
            Some(tariff_id) => match self.repos.tariffs().find_base_charge(tariff_id).await? {
                Some(charge) => round_money(charge),
                None => {
                    warnings.push(BillingWarning::MissingBaseCharge { tariff_id });
                    Decimal::ZERO
                }
            },
            None => Decimal::ZERO,
        };

        if consumption.is_zero() {
            warnings.push(BillingWarning::ZeroConsumption);
        } else if consumption > self.config.high_consumption_threshold {
            warnings.push(BillingWarning::HighConsumption {
                consumption,
                threshold: self.config.high_consumption_threshold,
            });
        }

        let consumption_amount = allocation.consumption_amount();
        let result = ConsumptionResult {
            meter_id,
            consumption,
            consumption_amount,
            base_charge,
            total_before_fees: consumption_amount + base_charge,
            breakdown: allocation.lines,
            cumulative_offset: offset.units,
            tariff_source: selection.source(),
            warnings,
        };

        self.record_metrics(&result, started);

        if result.warnings.is_empty() {
            info!(
                meter_id,
                consumption = %consumption,
                amount = %result.consumption_amount,
                base_charge = %result.base_charge,
                tariff_source = %result.tariff_source,
                "Consumption calculated"
            );
        } else {
            warn!(
                meter_id,
                consumption = %consumption,
                amount = %result.consumption_amount,
                tariff_source = %result.tariff_source,
                warnings = ?result.warning_messages(),
                "Consumption calculated with warnings"
            );
        }

        Ok(result)
    }

    /// Bill the difference between two register (counter) values.
    pub async fn calculate_from_register(
        &self,
        meter_id: i32,
        previous_value: Decimal,
        current_value: Decimal,
        options: CalculationOptions,
    ) -> DomainResult<ConsumptionResult> {
        let consumption = current_value - previous_value;
        if consumption < Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "Current register value {} is below previous value {}",
                current_value, previous_value
            )));
        }

        self.calculate_consumption(meter_id, consumption, options)
            .await
    }

    /// Rolling average over the last `last_n` approved readings
    /// (configured default window when `None`).
    pub async fn average_consumption(
        &self,
        meter_id: i32,
        last_n: Option<u32>,
    ) -> DomainResult<RollingAverage> {
        let window = last_n.unwrap_or(self.config.default_average_window);
        ConsumptionAverager::new(self.repos.readings())
            .rolling_average(meter_id, window)
            .await
    }

    /// Bill the rolling average when no actual reading is available.
    #[instrument(skip(self, options))]
    pub async fn estimate_consumption(
        &self,
        meter_id: i32,
        last_n: Option<u32>,
        options: CalculationOptions,
    ) -> DomainResult<ConsumptionResult> {
        let average = self.average_consumption(meter_id, last_n).await?;
        let mut result = self
            .calculate_consumption(meter_id, round_money(average.average), options)
            .await?;

        let warning = BillingWarning::Estimated {
            readings: average.readings_used,
        };
        metrics::counter!("billing_warnings_total", "kind" => warning.kind()).increment(1);
        result.warnings.push(warning);

        Ok(result)
    }

    fn record_metrics(&self, result: &ConsumptionResult, started: Instant) {
        metrics::counter!("billing_calculations_total", "source" => result.tariff_source.to_string())
            .increment(1);
        for warning in &result.warnings {
            metrics::counter!("billing_warnings_total", "kind" => warning.kind()).increment(1);
        }
        metrics::histogram!("billing_calculation_duration_seconds")
            .record(started.elapsed().as_secs_f64());
    }
}
