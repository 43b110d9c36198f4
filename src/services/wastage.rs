//! Inventory loss records.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::datastore::Datastore;
use crate::entities::wastage;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::pricing;

use super::{validate_package_size, validate_unit_price};

/// The persisted `total_cost` is always derived here at write time; the
/// request carries no field for it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewWastageEntry {
    pub date: NaiveDate,
    #[validate(length(min = 1, message = "Product name is required"))]
    pub product_name: String,
    #[validate(length(min = 1, message = "Reason is required"))]
    pub reason: String,
    #[validate(length(min = 1, message = "Batch number is required"))]
    pub batch_number: String,
    pub use_by_date: NaiveDate,
    pub best_before: NaiveDate,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(custom = "validate_package_size")]
    pub package_size: Decimal,
    #[validate(custom = "validate_unit_price")]
    pub avg_price_per_kg: Decimal,
    #[validate(length(min = 1, message = "Checked-by is required"))]
    pub checked_by: String,
}

#[derive(Clone)]
pub struct WastageService {
    store: Arc<dyn Datastore>,
    events: EventSender,
}

impl WastageService {
    pub fn new(store: Arc<dyn Datastore>, events: EventSender) -> Self {
        Self { store, events }
    }

    #[instrument(
        skip(self, entry),
        fields(product = %entry.product_name, batch = %entry.batch_number)
    )]
    pub async fn record(&self, entry: NewWastageEntry) -> Result<i64, ServiceError> {
        entry.validate()?;
        let total_cost =
            pricing::wastage_cost(entry.avg_price_per_kg, entry.quantity, entry.package_size);
        let row = wastage::Model {
            id: 0,
            date: entry.date,
            product_name: entry.product_name,
            reason: entry.reason,
            batch_number: entry.batch_number,
            use_by_date: entry.use_by_date,
            best_before: entry.best_before,
            quantity: entry.quantity,
            package_size: entry.package_size,
            avg_price_per_kg: entry.avg_price_per_kg,
            total_cost,
            checked_by: entry.checked_by,
        };
        let id = self.store.append_wastage(row).await?;
        self.emit(Event::WastageRecorded { id }).await;
        info!(id, %total_cost, "wastage recorded");
        Ok(id)
    }

    pub async fn list(&self) -> Result<Vec<wastage::Model>, ServiceError> {
        Ok(self.store.fetch_wastage().await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let removed = self.store.delete_wastage(id).await?;
        if removed == 0 {
            return Err(ServiceError::NotFound(format!(
                "Wastage entry {id} not found"
            )));
        }
        self.emit(Event::WastageDeleted { id }).await;
        Ok(())
    }

    async fn emit(&self, event: Event) {
        if let Err(e) = self.events.send(event).await {
            warn!(error = %e, "failed to emit event");
        }
    }
}

/// Total cost across a set of wastage rows.
pub fn total_loss(rows: &[wastage::Model]) -> Decimal {
    rows.iter().map(|row| row.total_cost).sum()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn total_loss_sums_row_costs() {
        let row = |total_cost| wastage::Model {
            id: 0,
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            product_name: "Green Tea".into(),
            reason: "water damage".into(),
            batch_number: "B-2".into(),
            use_by_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            best_before: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            quantity: 1,
            package_size: dec!(0.5),
            avg_price_per_kg: dec!(10.00),
            total_cost,
            checked_by: "MV".into(),
        };
        assert_eq!(total_loss(&[row(dec!(5.00)), row(dec!(7.50))]), dec!(12.50));
        assert_eq!(total_loss(&[]), Decimal::ZERO);
    }
}
