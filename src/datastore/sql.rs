use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::debug;

use crate::db::DbPool;
use crate::entities::{product, stock_in, stock_out, wastage};

use super::{Datastore, StoreError};

/// Relational backend over SQLite or Postgres, selected by connection URL.
#[derive(Clone)]
pub struct SqlDatastore {
    db: Arc<DbPool>,
}

impl SqlDatastore {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }
}

fn sales_active(row: stock_out::Model) -> stock_out::ActiveModel {
    let mut active: stock_out::ActiveModel = row.into();
    active.id = ActiveValue::NotSet;
    active
}

#[async_trait]
impl Datastore for SqlDatastore {
    async fn fetch_sales(&self) -> Result<Vec<stock_out::Model>, StoreError> {
        Ok(stock_out::Entity::find()
            .order_by_asc(stock_out::Column::Id)
            .all(&*self.db)
            .await?)
    }

    async fn fetch_order(&self, order_number: &str) -> Result<Vec<stock_out::Model>, StoreError> {
        Ok(stock_out::Entity::find()
            .filter(stock_out::Column::OrderNumber.eq(order_number))
            .order_by_asc(stock_out::Column::Id)
            .all(&*self.db)
            .await?)
    }

    async fn append_sales(&self, rows: Vec<stock_out::Model>) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }
        let txn = self.db.begin().await?;
        stock_out::Entity::insert_many(rows.into_iter().map(sales_active))
            .exec(&txn)
            .await?;
        txn.commit().await?;
        Ok(())
    }

    async fn replace_order(
        &self,
        order_number: &str,
        rows: Vec<stock_out::Model>,
    ) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;
        let deleted = stock_out::Entity::delete_many()
            .filter(stock_out::Column::OrderNumber.eq(order_number))
            .exec(&txn)
            .await?;
        if !rows.is_empty() {
            stock_out::Entity::insert_many(rows.into_iter().map(sales_active))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;
        debug!(
            order_number,
            replaced = deleted.rows_affected,
            "order rows swapped"
        );
        Ok(())
    }

    async fn delete_order(&self, order_number: &str) -> Result<u64, StoreError> {
        let res = stock_out::Entity::delete_many()
            .filter(stock_out::Column::OrderNumber.eq(order_number))
            .exec(&*self.db)
            .await?;
        Ok(res.rows_affected)
    }

    async fn fetch_stock_in(&self) -> Result<Vec<stock_in::Model>, StoreError> {
        Ok(stock_in::Entity::find()
            .order_by_asc(stock_in::Column::Id)
            .all(&*self.db)
            .await?)
    }

    async fn append_stock_in(&self, row: stock_in::Model) -> Result<i64, StoreError> {
        let mut active: stock_in::ActiveModel = row.into();
        active.id = ActiveValue::NotSet;
        let inserted = active.insert(&*self.db).await?;
        Ok(inserted.id)
    }

    async fn delete_stock_in(&self, id: i64) -> Result<u64, StoreError> {
        let res = stock_in::Entity::delete_many()
            .filter(stock_in::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(res.rows_affected)
    }

    async fn fetch_wastage(&self) -> Result<Vec<wastage::Model>, StoreError> {
        Ok(wastage::Entity::find()
            .order_by_asc(wastage::Column::Id)
            .all(&*self.db)
            .await?)
    }

    async fn append_wastage(&self, row: wastage::Model) -> Result<i64, StoreError> {
        let mut active: wastage::ActiveModel = row.into();
        active.id = ActiveValue::NotSet;
        let inserted = active.insert(&*self.db).await?;
        Ok(inserted.id)
    }

    async fn delete_wastage(&self, id: i64) -> Result<u64, StoreError> {
        let res = wastage::Entity::delete_many()
            .filter(wastage::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(res.rows_affected)
    }

    async fn fetch_products(&self) -> Result<Vec<product::Model>, StoreError> {
        Ok(product::Entity::find()
            .order_by_asc(product::Column::Id)
            .all(&*self.db)
            .await?)
    }

    async fn append_product(&self, row: product::Model) -> Result<i64, StoreError> {
        let mut active: product::ActiveModel = row.into();
        active.id = ActiveValue::NotSet;
        let inserted = active.insert(&*self.db).await?;
        Ok(inserted.id)
    }

    async fn delete_product(&self, id: i64) -> Result<u64, StoreError> {
        let res = product::Entity::delete_many()
            .filter(product::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(res.rows_affected)
    }
}
