//! Goods-receipt records.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::datastore::Datastore;
use crate::entities::stock_in;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{Category, ProductStatus};
use crate::services::pricing;

use super::{validate_package_size, validate_unit_price};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewStockInEntry {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub product_name: String,
    pub category: Category,
    #[validate(length(min = 1, message = "Supplier name is required"))]
    pub supplier_name: String,
    #[validate(length(min = 1, message = "Invoice number is required"))]
    pub invoice_number: String,
    #[validate(length(min = 1, message = "Batch number is required"))]
    pub batch_number: String,
    pub use_by_date: NaiveDate,
    pub best_before: NaiveDate,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(custom = "validate_package_size")]
    pub package_size: Decimal,
    #[validate(custom = "validate_unit_price")]
    pub price_per_unit: Decimal,
    pub product_free_from_damage: bool,
    pub labelling_match: bool,
    pub product_status: ProductStatus,
    #[validate(length(min = 1, message = "Checked-by is required"))]
    pub checked_by: String,
}

/// Receipt row plus its read-time derived stock value.
#[derive(Debug, Serialize)]
pub struct StockInRecord {
    #[serde(flatten)]
    pub row: stock_in::Model,
    /// quantity × package size × price per unit, derived on read.
    pub stock_value: Decimal,
}

#[derive(Clone)]
pub struct StockInService {
    store: Arc<dyn Datastore>,
    events: EventSender,
}

impl StockInService {
    pub fn new(store: Arc<dyn Datastore>, events: EventSender) -> Self {
        Self { store, events }
    }

    /// Validates and persists a receipt. Rows are immutable once written;
    /// the only later mutation is an explicit delete.
    #[instrument(
        skip(self, entry),
        fields(product = %entry.product_name, batch = %entry.batch_number)
    )]
    pub async fn record(&self, entry: NewStockInEntry) -> Result<i64, ServiceError> {
        entry.validate()?;
        let row = stock_in::Model {
            id: 0,
            product_name: entry.product_name,
            category: entry.category.to_string(),
            supplier_name: entry.supplier_name,
            invoice_number: entry.invoice_number,
            batch_number: entry.batch_number,
            use_by_date: entry.use_by_date,
            best_before: entry.best_before,
            quantity: entry.quantity,
            package_size: entry.package_size,
            price_per_unit: entry.price_per_unit,
            product_free_from_damage: entry.product_free_from_damage,
            labelling_match: entry.labelling_match,
            product_status: entry.product_status.to_string(),
            checked_by: entry.checked_by,
        };
        let id = self.store.append_stock_in(row).await?;
        self.emit(Event::StockInRecorded { id }).await;
        info!(id, "stock receipt recorded");
        Ok(id)
    }

    pub async fn list(&self) -> Result<Vec<StockInRecord>, ServiceError> {
        let rows = self.store.fetch_stock_in().await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let stock_value =
                    pricing::stock_value(row.quantity, row.package_size, row.price_per_unit);
                StockInRecord { row, stock_value }
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let removed = self.store.delete_stock_in(id).await?;
        if removed == 0 {
            return Err(ServiceError::NotFound(format!(
                "Stock-in entry {id} not found"
            )));
        }
        self.emit(Event::StockInDeleted { id }).await;
        Ok(())
    }

    async fn emit(&self, event: Event) {
        if let Err(e) = self.events.send(event).await {
            warn!(error = %e, "failed to emit event");
        }
    }
}
