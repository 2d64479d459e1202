//! Consumption calculation results

use rust_decimal::Decimal;

use crate::domain::tariff::TariffSource;
use crate::shared::money::round_money;

/// Options for a single consumption calculation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalculationOptions {
    /// Billing period being billed; required for cumulative mode
    pub billing_period_id: Option<i32>,
    /// Apply tier boundaries to year-to-date consumption
    pub use_cumulative: bool,
}

impl CalculationOptions {
    pub fn cumulative(billing_period_id: i32) -> Self {
        Self {
            billing_period_id: Some(billing_period_id),
            use_cumulative: true,
        }
    }

    /// Billing period to offset against, if cumulative mode can apply.
    pub fn cumulative_period(&self) -> Option<i32> {
        if self.use_cumulative {
            self.billing_period_id
        } else {
            None
        }
    }
}

/// Advisory raised during a calculation. Never blocks the result.
#[derive(Debug, Clone, PartialEq)]
pub enum BillingWarning {
    NoMatchingTariff { default_rate: Decimal },
    ZeroConsumption,
    HighConsumption { consumption: Decimal, threshold: Decimal },
    TierOverflow { units: Decimal, rate: Decimal },
    BillingPeriodNotFound { billing_period_id: i32 },
    MissingBaseCharge { tariff_id: i32 },
    Estimated { readings: usize },
}

impl BillingWarning {
    /// Stable identifier for metrics and API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoMatchingTariff { .. } => "no_matching_tariff",
            Self::ZeroConsumption => "zero_consumption",
            Self::HighConsumption { .. } => "high_consumption",
            Self::TierOverflow { .. } => "tier_overflow",
            Self::BillingPeriodNotFound { .. } => "billing_period_not_found",
            Self::MissingBaseCharge { .. } => "missing_base_charge",
            Self::Estimated { .. } => "estimated",
        }
    }
}

impl std::fmt::Display for BillingWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMatchingTariff { default_rate } => write!(
                f,
                "no matching tariff found, default rate {} applied",
                default_rate
            ),
            Self::ZeroConsumption => write!(f, "zero consumption, verify reading"),
            Self::HighConsumption {
                consumption,
                threshold,
            } => write!(
                f,
                "unusually high consumption ({} units, threshold {}), verify reading",
                consumption, threshold
            ),
            Self::TierOverflow { units, rate } => write!(
                f,
                "tiers do not cover the full consumption, {} units billed at last tier rate {}",
                units, rate
            ),
            Self::BillingPeriodNotFound { billing_period_id } => write!(
                f,
                "billing period {} not found, cumulative consumption ignored",
                billing_period_id
            ),
            Self::MissingBaseCharge { tariff_id } => {
                write!(f, "no base charge configured for tariff {}", tariff_id)
            }
            Self::Estimated { readings } => write!(
                f,
                "consumption estimated from the average of {} approved readings",
                readings
            ),
        }
    }
}

/// Units billed within one tier
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionBreakdownLine {
    pub tier_label: String,
    pub units_in_tier: Decimal,
    pub rate: Decimal,
    /// `units_in_tier * rate` at full precision
    pub amount: Decimal,
    /// Units beyond the declared tier table, billed at the last rate
    pub overflow: bool,
}

impl ConsumptionBreakdownLine {
    pub fn new(tier_label: impl Into<String>, units_in_tier: Decimal, rate: Decimal) -> Self {
        Self {
            tier_label: tier_label.into(),
            units_in_tier,
            rate,
            amount: units_in_tier * rate,
            overflow: false,
        }
    }

    /// Line amount as shown on a bill.
    pub fn reported_amount(&self) -> Decimal {
        round_money(self.amount)
    }
}

/// Base charge calculation for one meter
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionResult {
    pub meter_id: i32,
    pub consumption: Decimal,
    /// Sum of line amounts, rounded once
    pub consumption_amount: Decimal,
    pub breakdown: Vec<ConsumptionBreakdownLine>,
    pub base_charge: Decimal,
    pub total_before_fees: Decimal,
    /// Year-to-date units billed before this calculation
    pub cumulative_offset: Decimal,
    pub tariff_source: TariffSource,
    pub warnings: Vec<BillingWarning>,
}

impl ConsumptionResult {
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    pub fn has_warning(&self, kind: &str) -> bool {
        self.warnings.iter().any(|w| w.kind() == kind)
    }

    pub fn billed_units(&self) -> Decimal {
        self.breakdown.iter().map(|l| l.units_in_tier).sum()
    }
}
