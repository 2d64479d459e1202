//! Create meters table

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_customers::Customers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Meters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Meters::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Meters::SerialNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Meters::CustomerId).integer())
                    .col(ColumnDef::new(Meters::ServiceType).string_len(20))
                    .col(ColumnDef::new(Meters::TariffId).integer())
                    .col(
                        ColumnDef::new(Meters::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meters_customer")
                            .from(Meters::Table, Meters::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Meters::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Meters {
    Table,
    Id,
    SerialNumber,
    CustomerId,
    ServiceType,
    TariffId,
    CreatedAt,
}
