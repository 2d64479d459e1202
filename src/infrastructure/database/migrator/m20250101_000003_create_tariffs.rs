//! Create tariffs table with a sample residential electricity schedule

use rust_decimal::Decimal;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tariffs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tariffs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Tariffs::Code)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Tariffs::Name).string().not_null())
                    .col(
                        ColumnDef::new(Tariffs::TariffType)
                            .string_len(20)
                            .not_null()
                            .default("standard"),
                    )
                    .col(
                        ColumnDef::new(Tariffs::ServiceType)
                            .string_len(20)
                            .not_null()
                            .default("electricity"),
                    )
                    .col(
                        ColumnDef::new(Tariffs::CustomerCategory)
                            .string_len(20)
                            .not_null()
                            .default("residential"),
                    )
                    .col(
                        ColumnDef::new(Tariffs::FromUnit)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Tariffs::ToUnit).decimal_len(16, 4))
                    .col(
                        ColumnDef::new(Tariffs::PricePerUnit)
                            .decimal_len(16, 6)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Tariffs::FixedCharge).decimal_len(16, 4))
                    .col(
                        ColumnDef::new(Tariffs::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Tariffs::EffectiveFrom).date())
                    .col(ColumnDef::new(Tariffs::EffectiveTo).date())
                    .col(
                        ColumnDef::new(Tariffs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tariffs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tariffs_service_category")
                    .table(Tariffs::Table)
                    .col(Tariffs::ServiceType)
                    .col(Tariffs::CustomerCategory)
                    .to_owned(),
            )
            .await?;

        // Sample residential electricity schedule
        let now = chrono::Utc::now().to_rfc3339();
        let brackets: [(&str, &str, Decimal, Option<Decimal>, Decimal, Option<Decimal>); 3] = [
            (
                "RES-ELEC-1",
                "Residential electricity 0-100",
                Decimal::ZERO,
                Some(Decimal::new(100, 0)),
                Decimal::new(10, 2),
                Some(Decimal::new(500, 2)),
            ),
            (
                "RES-ELEC-2",
                "Residential electricity 101-300",
                Decimal::new(101, 0),
                Some(Decimal::new(300, 0)),
                Decimal::new(15, 2),
                None,
            ),
            (
                "RES-ELEC-3",
                "Residential electricity 301+",
                Decimal::new(301, 0),
                None,
                Decimal::new(20, 2),
                None,
            ),
        ];

        let mut insert = Query::insert()
            .into_table(Tariffs::Table)
            .columns([
                Tariffs::Code,
                Tariffs::Name,
                Tariffs::TariffType,
                Tariffs::ServiceType,
                Tariffs::CustomerCategory,
                Tariffs::FromUnit,
                Tariffs::ToUnit,
                Tariffs::PricePerUnit,
                Tariffs::FixedCharge,
                Tariffs::IsActive,
                Tariffs::CreatedAt,
                Tariffs::UpdatedAt,
            ])
            .to_owned();

        for (code, name, from_unit, to_unit, price, fixed_charge) in brackets {
            insert.values_panic([
                code.into(),
                name.into(),
                "standard".into(),
                "electricity".into(),
                "residential".into(),
                from_unit.into(),
                to_unit.into(),
                price.into(),
                fixed_charge.into(),
                true.into(),
                now.clone().into(),
                now.clone().into(),
            ]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tariffs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Tariffs {
    Table,
    Id,
    Code,
    Name,
    TariffType,
    ServiceType,
    CustomerCategory,
    FromUnit,
    ToUnit,
    PricePerUnit,
    FixedCharge,
    IsActive,
    EffectiveFrom,
    EffectiveTo,
    CreatedAt,
    UpdatedAt,
}
