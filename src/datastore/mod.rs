/*!
 * # Datastore
 *
 * Storage interface shared by every backend. Two implementations exist:
 * a relational store driven by sea-orm ([`SqlDatastore`]) and a
 * JSON-lines-per-table flat-file store ([`FlatFileDatastore`]). The backend
 * is picked once at startup from configuration.
 */

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::{product, stock_in, stock_out, wastage};

pub mod flatfile;
pub mod sql;

pub use flatfile::FlatFileDatastore;
pub use sql::SqlDatastore;

/// Backend failure. Surfaced to the caller verbatim; drafts are never
/// cleared on a storage failure so a retry loses nothing.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record in {table}: {source}")]
    Malformed {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Typed per-table operations required of any backend.
///
/// Rows fetched back are in stable ascending storage-id order. Bulk
/// operations are all-or-nothing: `append_sales` either persists every row
/// or none, and `replace_order` swaps an order's rows in a single atomic
/// step so no reader ever observes the order half-written.
#[async_trait]
pub trait Datastore: Send + Sync {
    async fn fetch_sales(&self) -> Result<Vec<stock_out::Model>, StoreError>;

    /// All sales rows belonging to one order.
    async fn fetch_order(&self, order_number: &str) -> Result<Vec<stock_out::Model>, StoreError>;

    /// Inserts one row per line item. Storage assigns the ids.
    async fn append_sales(&self, rows: Vec<stock_out::Model>) -> Result<(), StoreError>;

    /// Atomically replaces every row of `order_number` with `rows`.
    async fn replace_order(
        &self,
        order_number: &str,
        rows: Vec<stock_out::Model>,
    ) -> Result<(), StoreError>;

    /// Removes the order's rows, returning how many were deleted.
    /// Not an error when none match.
    async fn delete_order(&self, order_number: &str) -> Result<u64, StoreError>;

    async fn fetch_stock_in(&self) -> Result<Vec<stock_in::Model>, StoreError>;
    async fn append_stock_in(&self, row: stock_in::Model) -> Result<i64, StoreError>;
    async fn delete_stock_in(&self, id: i64) -> Result<u64, StoreError>;

    async fn fetch_wastage(&self) -> Result<Vec<wastage::Model>, StoreError>;
    async fn append_wastage(&self, row: wastage::Model) -> Result<i64, StoreError>;
    async fn delete_wastage(&self, id: i64) -> Result<u64, StoreError>;

    async fn fetch_products(&self) -> Result<Vec<product::Model>, StoreError>;
    async fn append_product(&self, row: product::Model) -> Result<i64, StoreError>;
    async fn delete_product(&self, id: i64) -> Result<u64, StoreError>;
}
