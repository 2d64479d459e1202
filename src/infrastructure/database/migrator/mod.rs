//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_customers;
mod m20250101_000002_create_meters;
mod m20250101_000003_create_tariffs;
mod m20250101_000004_create_billing_periods;
mod m20250101_000005_create_meter_readings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_customers::Migration),
            Box::new(m20250101_000002_create_meters::Migration),
            Box::new(m20250101_000003_create_tariffs::Migration),
            Box::new(m20250101_000004_create_billing_periods::Migration),
            Box::new(m20250101_000005_create_meter_readings::Migration),
        ]
    }
}
