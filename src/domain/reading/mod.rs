//! Meter reading aggregate

pub mod model;
pub mod repository;

pub use model::{BillingPeriod, Reading};
pub use repository::ReadingRepository;
