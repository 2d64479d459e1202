pub mod billing;
pub mod meter;
pub mod reading;
pub mod repositories;
pub mod tariff;

// Re-export commonly used types
pub use billing::{BillingWarning, CalculationOptions, ConsumptionBreakdownLine, ConsumptionResult};
pub use meter::{CustomerCategory, MeterProfile, MeterRepository, ServiceType};
pub use reading::{BillingPeriod, Reading, ReadingRepository};
pub use repositories::{DomainResult, RepositoryProvider};
pub use tariff::{
    TariffKind, TariffRecord, TariffRepository, TariffSelection, TariffSource, TariffTier,
};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
