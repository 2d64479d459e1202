//! Tariff domain entities
//!
//! A tariff record is one price bracket for a (service type, customer
//! category) pair, or a meter-specific flat rate. The billing engine only
//! ever sees [`TariffTier`] values resolved into a [`TariffSelection`].

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::meter::{CustomerCategory, ServiceType};

/// Kind of tariff record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TariffKind {
    #[default]
    Standard,
    Custom,
    Promotional,
    Contract,
}

impl std::fmt::Display for TariffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Custom => write!(f, "custom"),
            Self::Promotional => write!(f, "promotional"),
            Self::Contract => write!(f, "contract"),
        }
    }
}

/// Stored tariff bracket
#[derive(Debug, Clone, PartialEq)]
pub struct TariffRecord {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub kind: TariffKind,
    pub service_type: ServiceType,
    pub customer_category: CustomerCategory,
    pub from_unit: Decimal,
    /// Upper bound (inclusive). `None` = open-ended
    pub to_unit: Option<Decimal>,
    pub price_per_unit: Decimal,
    /// Flat charge per bill, `None` when not configured
    pub fixed_charge: Option<Decimal>,
    pub is_active: bool,
    pub effective_from: Option<NaiveDate>,
    pub effective_to: Option<NaiveDate>,
}

impl TariffRecord {
    /// Whether the record may be used for billing on `date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        if !self.is_active {
            return false;
        }

        if let Some(from) = self.effective_from {
            if date < from {
                return false;
            }
        }

        if let Some(to) = self.effective_to {
            if date > to {
                return false;
            }
        }

        true
    }

    /// Label shown on breakdown lines, e.g. `"101-300"` or `"301+"`.
    pub fn bracket_label(&self) -> String {
        match self.to_unit {
            Some(to) => format!("{}-{}", self.from_unit.normalize(), to.normalize()),
            None => format!("{}+", self.from_unit.normalize()),
        }
    }

    /// This record as one bracket of a category schedule.
    pub fn to_tier(&self) -> TariffTier {
        TariffTier {
            from_unit: self.from_unit,
            to_unit: self.to_unit,
            price_per_unit: self.price_per_unit,
            label: self.bracket_label(),
            tariff_id: Some(self.id),
        }
    }

    /// This record as a meter override: one unbounded tier at its price.
    pub fn to_override_tier(&self) -> TariffTier {
        TariffTier::unbounded(self.price_per_unit, self.name.clone()).with_tariff_id(self.id)
    }
}

/// One progressive price bracket
#[derive(Debug, Clone, PartialEq)]
pub struct TariffTier {
    pub from_unit: Decimal,
    /// Inclusive upper bound; `None` means the tier never runs out
    pub to_unit: Option<Decimal>,
    pub price_per_unit: Decimal,
    pub label: String,
    pub tariff_id: Option<i32>,
}

impl TariffTier {
    pub fn new(
        from_unit: Decimal,
        to_unit: Option<Decimal>,
        price_per_unit: Decimal,
        label: impl Into<String>,
    ) -> Self {
        Self {
            from_unit,
            to_unit,
            price_per_unit,
            label: label.into(),
            tariff_id: None,
        }
    }

    /// Tier covering the full range from zero.
    pub fn unbounded(price_per_unit: Decimal, label: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, None, price_per_unit, label)
    }

    pub fn with_tariff_id(mut self, tariff_id: i32) -> Self {
        self.tariff_id = Some(tariff_id);
        self
    }

    pub fn is_open_ended(&self) -> bool {
        self.to_unit.is_none()
    }
}

/// Where a selection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TariffSource {
    /// Tariff assigned directly to the meter
    MeterOverride { tariff_id: i32 },
    /// Active brackets for the meter's service type and customer category
    Schedule,
    /// Nothing configured; synthetic tier at the default rate
    Fallback,
}

impl std::fmt::Display for TariffSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MeterOverride { .. } => write!(f, "meter_override"),
            Self::Schedule => write!(f, "schedule"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Ordered tiers to apply for one calculation
#[derive(Debug, Clone, PartialEq)]
pub struct TariffSelection {
    source: TariffSource,
    tiers: Vec<TariffTier>,
}

impl TariffSelection {
    pub fn meter_override(tariff_id: i32, tier: TariffTier) -> Self {
        Self {
            source: TariffSource::MeterOverride { tariff_id },
            tiers: vec![tier],
        }
    }

    /// Category schedule; tiers are put in ascending `from_unit` order.
    pub fn schedule(mut tiers: Vec<TariffTier>) -> Self {
        tiers.sort_by(|a, b| a.from_unit.cmp(&b.from_unit));
        Self {
            source: TariffSource::Schedule,
            tiers,
        }
    }

    pub fn fallback(default_rate: Decimal) -> Self {
        Self {
            source: TariffSource::Fallback,
            tiers: vec![TariffTier::unbounded(default_rate, "default")],
        }
    }

    pub fn source(&self) -> TariffSource {
        self.source
    }

    pub fn tiers(&self) -> &[TariffTier] {
        &self.tiers
    }

    pub fn is_fallback(&self) -> bool {
        self.source == TariffSource::Fallback
    }

    /// Tariff whose fixed charge applies to the bill: the override itself,
    /// or the first bracket of a schedule.
    pub fn base_tariff_id(&self) -> Option<i32> {
        match self.source {
            TariffSource::MeterOverride { tariff_id } => Some(tariff_id),
            TariffSource::Schedule => self.tiers.first().and_then(|t| t.tariff_id),
            TariffSource::Fallback => None,
        }
    }
}
