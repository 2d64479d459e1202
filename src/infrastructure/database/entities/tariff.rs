//! Tariff entity - one price bracket or a meter-specific rate

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tariff type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TariffType {
    #[default]
    #[sea_orm(string_value = "standard")]
    Standard,
    #[sea_orm(string_value = "custom")]
    Custom,
    #[sea_orm(string_value = "promotional")]
    Promotional,
    #[sea_orm(string_value = "contract")]
    Contract,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tariffs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub code: String,

    pub name: String,

    pub tariff_type: TariffType,

    pub service_type: String,

    pub customer_category: String,

    /// First unit of the bracket
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub from_unit: Decimal,

    /// Last unit of the bracket (inclusive), `NULL` = open-ended
    #[sea_orm(column_type = "Decimal(Some((16, 4)))", nullable)]
    pub to_unit: Option<Decimal>,

    #[sea_orm(column_type = "Decimal(Some((16, 6)))")]
    pub price_per_unit: Decimal,

    /// Flat charge added once per bill
    #[sea_orm(column_type = "Decimal(Some((16, 4)))", nullable)]
    pub fixed_charge: Option<Decimal>,

    pub is_active: bool,

    pub effective_from: Option<NaiveDate>,

    pub effective_to: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
