//! Create billing_periods table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BillingPeriods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BillingPeriods::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BillingPeriods::Name).string_len(50).not_null())
                    .col(ColumnDef::new(BillingPeriods::StartDate).date().not_null())
                    .col(ColumnDef::new(BillingPeriods::EndDate).date().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BillingPeriods::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BillingPeriods {
    Table,
    Id,
    Name,
    StartDate,
    EndDate,
}
