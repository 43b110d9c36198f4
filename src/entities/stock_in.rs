use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Goods-receipt record. Immutable once written except by explicit delete;
/// `stock_value` is derived at read time, never stored.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_in")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_name: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub category: String,
    pub supplier_name: String,
    pub invoice_number: String,
    pub batch_number: String,
    pub use_by_date: NaiveDate,
    pub best_before: NaiveDate,
    pub quantity: i32,
    /// Kilograms per package.
    pub package_size: Decimal,
    pub price_per_unit: Decimal,
    pub product_free_from_damage: bool,
    pub labelling_match: bool,
    pub product_status: String,
    pub checked_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
