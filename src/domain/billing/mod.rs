//! Billing calculation values

pub mod model;

pub use model::{BillingWarning, CalculationOptions, ConsumptionBreakdownLine, ConsumptionResult};
