use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory loss record (spoilage, damage, disposal).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wastage")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: NaiveDate,
    pub product_name: String,
    pub reason: String,
    pub batch_number: String,
    pub use_by_date: NaiveDate,
    pub best_before: NaiveDate,
    pub quantity: i32,
    pub package_size: Decimal,
    pub avg_price_per_kg: Decimal,
    /// Always avg_price_per_kg × quantity × package_size, recomputed at write time.
    pub total_cost: Decimal,
    pub checked_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
