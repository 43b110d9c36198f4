//! Order lifecycle: draft sessions, create/edit workflow, submit and delete.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::datastore::Datastore;
use crate::entities::stock_out;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{Category, DeliveryMethod};
use crate::services::drafts::{DraftLineItem, DraftOrder, NewLineItem};
use crate::services::pricing;

/// Order header captured at submit time.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderHeader {
    pub date_of_sale: NaiveDate,
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    pub delivery_method: DeliveryMethod,
    #[validate(length(min = 1, message = "Order number is required"))]
    pub order_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowMode {
    Creating,
    Editing { order_number: String },
}

/// One session's order-building state machine. Starts in `Creating`;
/// `begin_edit` loads an existing order's rows into the draft. Every
/// failure path leaves the draft intact; it is only cleared on confirmed
/// success or explicit cancel.
pub struct OrderWorkflow {
    mode: WorkflowMode,
    draft: DraftOrder,
    store: Arc<dyn Datastore>,
    events: EventSender,
}

impl std::fmt::Debug for OrderWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderWorkflow")
            .field("mode", &self.mode)
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}

impl OrderWorkflow {
    pub fn new(store: Arc<dyn Datastore>, events: EventSender) -> Self {
        Self {
            mode: WorkflowMode::Creating,
            draft: DraftOrder::new(),
            store,
            events,
        }
    }

    pub fn mode(&self) -> &WorkflowMode {
        &self.mode
    }

    pub fn items(&self) -> &[DraftLineItem] {
        self.draft.items()
    }

    pub fn order_total(&self) -> Decimal {
        self.draft.order_total()
    }

    pub fn add_item(&mut self, candidate: NewLineItem) -> Result<(), ServiceError> {
        self.draft.add_item(candidate)
    }

    pub fn remove_item(&mut self, position: usize) -> Result<(), ServiceError> {
        self.draft.remove_item(position)
    }

    /// Resets to an empty creation draft.
    pub fn begin_create(&mut self) {
        self.draft.clear();
        self.mode = WorkflowMode::Creating;
    }

    /// Loads an existing order for editing. When no rows exist under the
    /// order number the workflow falls back to an empty creation draft and
    /// reports `NotFound`.
    #[instrument(skip(self))]
    pub async fn begin_edit(&mut self, order_number: &str) -> Result<(), ServiceError> {
        let rows = self.store.fetch_order(order_number).await?;
        if rows.is_empty() {
            self.begin_create();
            return Err(ServiceError::NotFound(format!(
                "Order {order_number} not found"
            )));
        }
        let items = rows
            .into_iter()
            .map(row_to_draft_item)
            .collect::<Result<Vec<_>, _>>()?;
        self.draft = DraftOrder::from_items(items);
        self.mode = WorkflowMode::Editing {
            order_number: order_number.to_string(),
        };
        Ok(())
    }

    /// Persists the draft. Creating appends the rows; editing atomically
    /// replaces the order's previous rows. Totals are recomputed from
    /// quantity × unit price while building the rows, so insert and edit
    /// paths can never disagree.
    #[instrument(
        skip(self, header),
        fields(order_number = %header.order_number, customer = %header.customer_name)
    )]
    pub async fn submit(&mut self, header: OrderHeader) -> Result<String, ServiceError> {
        if self.draft.is_empty() {
            return Err(ServiceError::EmptyOrder);
        }
        header.validate()?;
        if let WorkflowMode::Editing { order_number } = &self.mode {
            if order_number != &header.order_number {
                return Err(ServiceError::Validation(format!(
                    "Order number cannot change while editing {order_number}"
                )));
            }
        }

        let rows = build_rows(&header, self.draft.items());
        let line_count = rows.len();

        match self.mode.clone() {
            WorkflowMode::Creating => {
                self.store.append_sales(rows).await?;
                self.emit(Event::OrderSubmitted {
                    order_number: header.order_number.clone(),
                    line_count,
                })
                .await;
            }
            WorkflowMode::Editing { order_number } => {
                self.store.replace_order(&order_number, rows).await?;
                self.emit(Event::OrderReplaced {
                    order_number,
                    line_count,
                })
                .await;
            }
        }

        self.draft.clear();
        self.mode = WorkflowMode::Creating;
        info!(line_count, "order persisted");
        Ok(header.order_number)
    }

    /// Discards the draft and any loaded edit state.
    pub fn cancel(&mut self) {
        self.begin_create();
    }

    async fn emit(&self, event: Event) {
        if let Err(e) = self.events.send(event).await {
            warn!(error = %e, "failed to emit event");
        }
    }
}

fn row_to_draft_item(row: stock_out::Model) -> Result<DraftLineItem, ServiceError> {
    let category = row.category.parse::<Category>().map_err(|_| {
        ServiceError::Internal(format!(
            "stored category {:?} on order {} is not recognized",
            row.category, row.order_number
        ))
    })?;
    Ok(DraftLineItem {
        product_name: row.product_name,
        category,
        size: row.size,
        sku: row.sku,
        batch_number: row.batch_number,
        quantity: row.quantity,
        price_per_unit: row.price_per_unit,
        total_price: pricing::line_total(row.quantity, row.price_per_unit),
        best_before: row.best_before,
        production_date: row.production_date,
        labelling_match: row.labelling_match,
        checked_by: row.checked_by,
    })
}

fn build_rows(header: &OrderHeader, items: &[DraftLineItem]) -> Vec<stock_out::Model> {
    items
        .iter()
        .map(|item| stock_out::Model {
            id: 0,
            date: header.date_of_sale,
            product_name: item.product_name.clone(),
            size: item.size.clone(),
            category: item.category.to_string(),
            sku: item.sku.clone(),
            customer_name: header.customer_name.clone(),
            order_number: header.order_number.clone(),
            batch_number: item.batch_number.clone(),
            best_before: item.best_before,
            production_date: item.production_date,
            quantity: item.quantity,
            price_per_unit: item.price_per_unit,
            total_price: pricing::line_total(item.quantity, item.price_per_unit),
            delivery_method: header.delivery_method.to_string(),
            labelling_match: item.labelling_match,
            checked_by: item.checked_by.clone(),
        })
        .collect()
}

/// Full view of one persisted order.
#[derive(Debug, Serialize)]
pub struct OrderDetails {
    pub order_number: String,
    pub date_of_sale: NaiveDate,
    pub customer_name: String,
    pub delivery_method: String,
    pub total_price: Decimal,
    pub items: Vec<stock_out::Model>,
}

/// Service owning the draft-session registry plus order-level reads and
/// deletes. Each session holds an independent [`OrderWorkflow`]; nothing is
/// shared between sessions except the datastore itself.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn Datastore>,
    events: EventSender,
    sessions: Arc<DashMap<Uuid, Arc<Mutex<OrderWorkflow>>>>,
}

impl OrderService {
    pub fn new(store: Arc<dyn Datastore>, events: EventSender) -> Self {
        Self {
            store,
            events,
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Opens a fresh draft session and returns its id.
    pub fn open_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            Arc::new(Mutex::new(OrderWorkflow::new(
                self.store.clone(),
                self.events.clone(),
            ))),
        );
        id
    }

    /// Looks up a session's workflow. The `Arc` is cloned out so callers
    /// never hold a map shard lock across an await.
    pub fn workflow(&self, session: Uuid) -> Result<Arc<Mutex<OrderWorkflow>>, ServiceError> {
        self.sessions
            .get(&session)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ServiceError::NotFound(format!("Draft session {session} not found")))
    }

    pub fn close_session(&self, session: Uuid) -> bool {
        self.sessions.remove(&session).is_some()
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, order_number: &str) -> Result<OrderDetails, ServiceError> {
        let rows = self.store.fetch_order(order_number).await?;
        let first = rows.first().ok_or_else(|| {
            ServiceError::NotFound(format!("Order {order_number} not found"))
        })?;
        Ok(OrderDetails {
            order_number: first.order_number.clone(),
            date_of_sale: first.date,
            customer_name: first.customer_name.clone(),
            delivery_method: first.delivery_method.clone(),
            total_price: rows.iter().map(|r| r.total_price).sum(),
            items: rows,
        })
    }

    /// Deletes the order header and all of its line items as a unit.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, order_number: &str) -> Result<u64, ServiceError> {
        let removed = self.store.delete_order(order_number).await?;
        if removed == 0 {
            return Err(ServiceError::NotFound(format!(
                "Order {order_number} not found"
            )));
        }
        if let Err(e) = self
            .events
            .send(Event::OrderDeleted {
                order_number: order_number.to_string(),
            })
            .await
        {
            warn!(error = %e, "failed to emit event");
        }
        info!(removed, "order deleted");
        Ok(removed)
    }

    /// Suggests an order number the operator can accept or overwrite.
    pub fn suggest_order_number(&self) -> String {
        generate_order_number()
    }
}

/// `ORD-YYYYMMDD-XXXX` with a random uppercase alphanumeric suffix.
pub fn generate_order_number() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("ORD-{}-{}", Utc::now().format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_order_numbers_have_the_expected_shape() {
        let number = generate_order_number();
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
