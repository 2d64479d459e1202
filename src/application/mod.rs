//! Application layer - billing use cases

pub mod billing;

pub use billing::{BillingEngine, ConsumptionAverager, CumulativeAggregator, TariffResolver};
