//! Product catalog. Metadata only: catalog entries are not referentially
//! linked to the batch numbers in stock movements.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::datastore::Datastore;
use crate::entities::product;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::Category;

use super::validate_non_negative_price;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    pub category: Category,
    pub sku: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "validate_non_negative_price")]
    pub price: Decimal,
    #[validate(range(min = 0, message = "Stock level cannot be negative"))]
    #[serde(default)]
    pub stock_level: i32,
    pub size: Option<String>,
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    #[serde(default)]
    pub reorder_level: i32,
}

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn Datastore>,
    events: EventSender,
}

impl ProductService {
    pub fn new(store: Arc<dyn Datastore>, events: EventSender) -> Self {
        Self { store, events }
    }

    #[instrument(skip(self, entry), fields(name = %entry.name))]
    pub async fn add(&self, entry: NewProduct) -> Result<i64, ServiceError> {
        entry.validate()?;
        let row = product::Model {
            id: 0,
            name: entry.name,
            category: entry.category.to_string(),
            sku: entry.sku,
            description: entry.description,
            price: entry.price,
            stock_level: entry.stock_level,
            size: entry.size,
            reorder_level: entry.reorder_level,
            created_at: Utc::now(),
        };
        let id = self.store.append_product(row).await?;
        self.emit(Event::ProductAdded { id }).await;
        info!(id, "product added to catalog");
        Ok(id)
    }

    pub async fn list(&self) -> Result<Vec<product::Model>, ServiceError> {
        Ok(self.store.fetch_products().await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let removed = self.store.delete_product(id).await?;
        if removed == 0 {
            return Err(ServiceError::NotFound(format!("Product {id} not found")));
        }
        self.emit(Event::ProductDeleted { id }).await;
        Ok(())
    }

    async fn emit(&self, event: Event) {
        if let Err(e) = self.events.send(event).await {
            warn!(error = %e, "failed to emit event");
        }
    }
}
