//! # Utility Billing
//!
//! Tiered and cumulative consumption billing for utility meters.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Meters, tariffs, readings, billing results and repository traits
//! - **application**: Tariff resolution, tier allocation, cumulative offsets and averages
//! - **infrastructure**: SeaORM database, migrations and the in-memory store
//! - **interfaces**: REST API with Swagger documentation and Prometheus metrics
//! - **server**: Service lifecycle (startup, graceful shutdown, tracing)

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, BillingConfig};

pub use application::BillingEngine;

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;

pub use server::{init_tracing, ServerHandle, ServerOptions};
