use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::entities::{product, stock_in, stock_out, wastage};

use super::{Datastore, StoreError};

/// Flat-file backend: one JSON-lines file per table under a data directory.
///
/// Mutations rewrite the whole table file through a temp-file rename, so a
/// crash mid-write leaves the previous contents intact and `replace_order`
/// is a single atomic swap. A store-wide mutex serializes mutations; reads
/// go straight to the file.
pub struct FlatFileDatastore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

/// Row types the store knows how to lay out on disk.
trait StoredRow: Serialize + DeserializeOwned + Send {
    const FILE: &'static str;
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

macro_rules! stored_row {
    ($model:ty, $file:literal) => {
        impl StoredRow for $model {
            const FILE: &'static str = $file;
            fn id(&self) -> i64 {
                self.id
            }
            fn set_id(&mut self, id: i64) {
                self.id = id;
            }
        }
    };
}

stored_row!(stock_out::Model, "stock_out.jsonl");
stored_row!(stock_in::Model, "stock_in.jsonl");
stored_row!(wastage::Model, "wastage.jsonl");
stored_row!(product::Model, "products.jsonl");

impl FlatFileDatastore {
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        fs::create_dir_all(dir.as_ref()).await?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    async fn read_table<T: StoredRow>(&self) -> Result<Vec<T>, StoreError> {
        let path = self.dir.join(T::FILE);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|source| StoreError::Malformed {
                    table: T::FILE,
                    source,
                })
            })
            .collect()
    }

    async fn write_table<T: StoredRow>(&self, rows: &[T]) -> Result<(), StoreError> {
        let mut buf = String::new();
        for row in rows {
            let line = serde_json::to_string(row).map_err(|source| StoreError::Malformed {
                table: T::FILE,
                source,
            })?;
            buf.push_str(&line);
            buf.push('\n');
        }
        let tmp = self.dir.join(format!("{}.tmp", T::FILE));
        fs::write(&tmp, buf).await?;
        fs::rename(&tmp, self.dir.join(T::FILE)).await?;
        Ok(())
    }

    fn next_id<T: StoredRow>(rows: &[T]) -> i64 {
        rows.iter().map(StoredRow::id).max().unwrap_or(0) + 1
    }

    async fn append_row<T: StoredRow>(&self, mut row: T) -> Result<i64, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut rows: Vec<T> = self.read_table().await?;
        let id = Self::next_id(&rows);
        row.set_id(id);
        rows.push(row);
        self.write_table(&rows).await?;
        Ok(id)
    }

    async fn retain_rows<T, F>(&self, keep: F) -> Result<u64, StoreError>
    where
        T: StoredRow,
        F: Fn(&T) -> bool,
    {
        let _guard = self.write_lock.lock().await;
        let mut rows: Vec<T> = self.read_table().await?;
        let before = rows.len();
        rows.retain(|row| keep(row));
        let removed = (before - rows.len()) as u64;
        if removed > 0 {
            self.write_table(&rows).await?;
        }
        Ok(removed)
    }
}

#[async_trait]
impl Datastore for FlatFileDatastore {
    async fn fetch_sales(&self) -> Result<Vec<stock_out::Model>, StoreError> {
        self.read_table().await
    }

    async fn fetch_order(&self, order_number: &str) -> Result<Vec<stock_out::Model>, StoreError> {
        let mut rows: Vec<stock_out::Model> = self.read_table().await?;
        rows.retain(|row| row.order_number == order_number);
        Ok(rows)
    }

    async fn append_sales(&self, new_rows: Vec<stock_out::Model>) -> Result<(), StoreError> {
        if new_rows.is_empty() {
            return Ok(());
        }
        let _guard = self.write_lock.lock().await;
        let mut rows: Vec<stock_out::Model> = self.read_table().await?;
        let mut id = Self::next_id(&rows);
        for mut row in new_rows {
            row.set_id(id);
            id += 1;
            rows.push(row);
        }
        self.write_table(&rows).await
    }

    async fn replace_order(
        &self,
        order_number: &str,
        new_rows: Vec<stock_out::Model>,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut rows: Vec<stock_out::Model> = self.read_table().await?;
        let before = rows.len();
        rows.retain(|row| row.order_number != order_number);
        let mut id = Self::next_id(&rows);
        for mut row in new_rows {
            row.set_id(id);
            id += 1;
            rows.push(row);
        }
        // One rename swaps the old rows for the new ones.
        self.write_table(&rows).await?;
        debug!(
            order_number,
            replaced = before - rows.len(),
            "order rows swapped"
        );
        Ok(())
    }

    async fn delete_order(&self, order_number: &str) -> Result<u64, StoreError> {
        self.retain_rows(|row: &stock_out::Model| row.order_number != order_number)
            .await
    }

    async fn fetch_stock_in(&self) -> Result<Vec<stock_in::Model>, StoreError> {
        self.read_table().await
    }

    async fn append_stock_in(&self, row: stock_in::Model) -> Result<i64, StoreError> {
        self.append_row(row).await
    }

    async fn delete_stock_in(&self, id: i64) -> Result<u64, StoreError> {
        self.retain_rows(|row: &stock_in::Model| row.id != id).await
    }

    async fn fetch_wastage(&self) -> Result<Vec<wastage::Model>, StoreError> {
        self.read_table().await
    }

    async fn append_wastage(&self, row: wastage::Model) -> Result<i64, StoreError> {
        self.append_row(row).await
    }

    async fn delete_wastage(&self, id: i64) -> Result<u64, StoreError> {
        self.retain_rows(|row: &wastage::Model| row.id != id).await
    }

    async fn fetch_products(&self) -> Result<Vec<product::Model>, StoreError> {
        self.read_table().await
    }

    async fn append_product(&self, row: product::Model) -> Result<i64, StoreError> {
        self.append_row(row).await
    }

    async fn delete_product(&self, id: i64) -> Result<u64, StoreError> {
        self.retain_rows(|row: &product::Model| row.id != id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    use super::*;

    fn sale(order_number: &str, product_name: &str) -> stock_out::Model {
        stock_out::Model {
            id: 0,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            product_name: product_name.to_string(),
            size: Some("100g".to_string()),
            category: "tea".to_string(),
            sku: Some("GT-100".to_string()),
            customer_name: "Jane".to_string(),
            order_number: order_number.to_string(),
            batch_number: "B-7".to_string(),
            best_before: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            production_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            quantity: 2,
            price_per_unit: dec!(5.00),
            total_price: dec!(10.00),
            delivery_method: "Courier".to_string(),
            labelling_match: true,
            checked_by: "MV".to_string(),
        }
    }

    #[tokio::test]
    async fn append_assigns_monotonic_ids_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = FlatFileDatastore::open(dir.path()).await.unwrap();

        store
            .append_sales(vec![sale("ORD-1", "Green Tea"), sale("ORD-1", "Mug")])
            .await
            .unwrap();
        store.append_sales(vec![sale("ORD-2", "Oolong")]).await.unwrap();

        let rows = store.fetch_sales().await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(rows[0].product_name, "Green Tea");
        assert_eq!(rows[0].total_price, dec!(10.00));
    }

    #[tokio::test]
    async fn replace_order_swaps_only_the_matching_rows() {
        let dir = TempDir::new().unwrap();
        let store = FlatFileDatastore::open(dir.path()).await.unwrap();

        store
            .append_sales(vec![sale("ORD-1", "Green Tea"), sale("ORD-2", "Oolong")])
            .await
            .unwrap();
        store
            .replace_order("ORD-1", vec![sale("ORD-1", "Sencha")])
            .await
            .unwrap();

        let ord1 = store.fetch_order("ORD-1").await.unwrap();
        assert_eq!(ord1.len(), 1);
        assert_eq!(ord1[0].product_name, "Sencha");

        let ord2 = store.fetch_order("ORD-2").await.unwrap();
        assert_eq!(ord2.len(), 1);
        assert_eq!(ord2[0].product_name, "Oolong");
    }

    #[tokio::test]
    async fn delete_order_reports_count_and_tolerates_missing_keys() {
        let dir = TempDir::new().unwrap();
        let store = FlatFileDatastore::open(dir.path()).await.unwrap();

        store
            .append_sales(vec![sale("ORD-1", "Green Tea"), sale("ORD-1", "Mug")])
            .await
            .unwrap();

        assert_eq!(store.delete_order("ORD-1").await.unwrap(), 2);
        assert_eq!(store.delete_order("ORD-1").await.unwrap(), 0);
        assert!(store.fetch_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_table_reads_as_empty_not_error() {
        let dir = TempDir::new().unwrap();
        let store = FlatFileDatastore::open(dir.path()).await.unwrap();
        assert!(store.fetch_products().await.unwrap().is_empty());
        assert_eq!(store.delete_product(42).await.unwrap(), 0);
    }
}
