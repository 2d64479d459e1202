//! Meter aggregate

pub mod model;
pub mod repository;

pub use model::{CustomerCategory, MeterProfile, ServiceType};
pub use repository::MeterRepository;
