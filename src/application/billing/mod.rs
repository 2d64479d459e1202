//! Consumption billing
//!
//! - `allocator` - progressive tier split (pure)
//! - `averager` - rolling average of approved readings
//! - `cumulative` - year-to-date offset for cumulative tariffs
//! - `resolver` - tariff selection for a meter
//! - `engine` - facade tying the above together

pub mod allocator;
pub mod averager;
pub mod cumulative;
pub mod engine;
pub mod resolver;

pub use allocator::{allocate, Allocation};
pub use averager::{average_consumption, ConsumptionAverager, RollingAverage};
pub use cumulative::{CumulativeAggregator, CumulativeOffset};
pub use engine::BillingEngine;
pub use resolver::TariffResolver;
