use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One persisted sales line. An order is the set of rows sharing an
/// `order_number`; header fields are denormalized onto every row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_out")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: NaiveDate,
    pub product_name: String,
    pub size: Option<String>,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub category: String,
    pub sku: Option<String>,
    pub customer_name: String,
    pub order_number: String,
    pub batch_number: String,
    pub best_before: NaiveDate,
    pub production_date: NaiveDate,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    /// Always quantity × price_per_unit, recomputed at write time.
    pub total_price: Decimal,
    pub delivery_method: String,
    pub labelling_match: bool,
    pub checked_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
