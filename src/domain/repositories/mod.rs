//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` — unified access to the collaborator repositories
//! - `DomainResult` — standard result type for domain operations

use super::meter::MeterRepository;
use super::reading::ReadingRepository;
use super::tariff::TariffRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to the read-only repositories the billing engine uses.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let meter = repos.meters().find_profile(42).await?;
///     let readings = repos.readings().find_latest_approved(42, 3).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn meters(&self) -> &dyn MeterRepository;
    fn tariffs(&self) -> &dyn TariffRepository;
    fn readings(&self) -> &dyn ReadingRepository;
}
