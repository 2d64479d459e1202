//! Create meter_readings table

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_meters::Meters;
use super::m20250101_000004_create_billing_periods::BillingPeriods;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MeterReadings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MeterReadings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MeterReadings::MeterId).integer().not_null())
                    .col(
                        ColumnDef::new(MeterReadings::BillingPeriodId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeterReadings::PreviousValue)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MeterReadings::CurrentValue)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MeterReadings::Consumption)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(MeterReadings::ReadingDate).date().not_null())
                    .col(
                        ColumnDef::new(MeterReadings::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(MeterReadings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meter_readings_meter")
                            .from(MeterReadings::Table, MeterReadings::MeterId)
                            .to(Meters::Table, Meters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meter_readings_billing_period")
                            .from(MeterReadings::Table, MeterReadings::BillingPeriodId)
                            .to(BillingPeriods::Table, BillingPeriods::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meter_readings_meter_date")
                    .table(MeterReadings::Table)
                    .col(MeterReadings::MeterId)
                    .col(MeterReadings::ReadingDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MeterReadings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum MeterReadings {
    Table,
    Id,
    MeterId,
    BillingPeriodId,
    PreviousValue,
    CurrentValue,
    Consumption,
    ReadingDate,
    Status,
    CreatedAt,
}
