//! In-memory accumulation of line items for one order being built or edited.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::ServiceError;
use crate::models::Category;
use crate::services::pricing;

use super::validate_unit_price;

/// Candidate line item. Derived totals are not accepted from the caller;
/// there is no field for them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewLineItem {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub product_name: String,
    pub category: Category,
    pub size: Option<String>,
    pub sku: Option<String>,
    #[validate(length(min = 1, message = "Batch number is required"))]
    pub batch_number: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(custom = "validate_unit_price")]
    pub price_per_unit: Decimal,
    pub best_before: NaiveDate,
    pub production_date: NaiveDate,
    #[serde(default)]
    pub labelling_match: bool,
    #[serde(default)]
    pub checked_by: String,
}

/// An accepted line item. `total_price` is always quantity × unit price and
/// is never edited independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftLineItem {
    pub product_name: String,
    pub category: Category,
    pub size: Option<String>,
    pub sku: Option<String>,
    pub batch_number: String,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub total_price: Decimal,
    pub best_before: NaiveDate,
    pub production_date: NaiveDate,
    pub labelling_match: bool,
    pub checked_by: String,
}

/// The mutable, in-progress set of line items for one order. Owns the
/// sequence exclusively until a successful submit hands the rows to the
/// datastore and the draft is cleared.
#[derive(Debug, Clone, Default)]
pub struct DraftOrder {
    items: Vec<DraftLineItem>,
}

impl DraftOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<DraftLineItem>) -> Self {
        Self { items }
    }

    /// Validates and appends a candidate. This is the single enforcement
    /// point for "an order must not contain incomplete items": on failure
    /// the sequence is unchanged.
    pub fn add_item(&mut self, candidate: NewLineItem) -> Result<(), ServiceError> {
        candidate.validate()?;
        let total_price = pricing::line_total(candidate.quantity, candidate.price_per_unit);
        self.items.push(DraftLineItem {
            product_name: candidate.product_name,
            category: candidate.category,
            size: candidate.size,
            sku: candidate.sku,
            batch_number: candidate.batch_number,
            quantity: candidate.quantity,
            price_per_unit: candidate.price_per_unit,
            total_price,
            best_before: candidate.best_before,
            production_date: candidate.production_date,
            labelling_match: candidate.labelling_match,
            checked_by: candidate.checked_by,
        });
        Ok(())
    }

    /// Removes the item at the given 0-based position; subsequent items
    /// shift down with no gaps.
    pub fn remove_item(&mut self, position: usize) -> Result<(), ServiceError> {
        if position >= self.items.len() {
            return Err(ServiceError::IndexOutOfBounds {
                index: position,
                len: self.items.len(),
            });
        }
        self.items.remove(position);
        Ok(())
    }

    pub fn items(&self) -> &[DraftLineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all item totals; zero for an empty draft.
    pub fn order_total(&self) -> Decimal {
        self.items.iter().map(|item| item.total_price).sum()
    }
}
