//! Meter reading entity

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Review state of a reading
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ReadingStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meter_readings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub meter_id: i32,

    pub billing_period_id: i32,

    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub previous_value: Decimal,

    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub current_value: Decimal,

    /// `current_value - previous_value`
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub consumption: Decimal,

    pub reading_date: NaiveDate,

    pub status: ReadingStatus,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::meter::Entity",
        from = "Column::MeterId",
        to = "super::meter::Column::Id"
    )]
    Meter,
    #[sea_orm(
        belongs_to = "super::billing_period::Entity",
        from = "Column::BillingPeriodId",
        to = "super::billing_period::Column::Id"
    )]
    BillingPeriod,
}

impl Related<super::meter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meter.def()
    }
}

impl Related<super::billing_period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillingPeriod.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
