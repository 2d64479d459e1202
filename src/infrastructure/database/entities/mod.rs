//! Database entities module

pub mod billing_period;
pub mod customer;
pub mod meter;
pub mod meter_reading;
pub mod tariff;

pub use billing_period::Entity as BillingPeriod;
pub use customer::Entity as Customer;
pub use meter::Entity as Meter;
pub use meter_reading::Entity as MeterReading;
pub use tariff::Entity as Tariff;
