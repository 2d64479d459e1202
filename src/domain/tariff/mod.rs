//! Tariff aggregate
//!
//! Contains tariff records, resolved tiers and the repository interface.

pub mod model;
pub mod repository;

pub use model::{TariffKind, TariffRecord, TariffSelection, TariffSource, TariffTier};
pub use repository::TariffRepository;
