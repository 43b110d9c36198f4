//! Stock receipts, wastage and catalog services against the flat-file
//! backend, including write-time derivation of cost fields.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use stockbook_api::datastore::{Datastore, FlatFileDatastore};
use stockbook_api::errors::ServiceError;
use stockbook_api::events::{channel, Event, EventSender};
use stockbook_api::models::{Category, ProductStatus};
use stockbook_api::services::products::{NewProduct, ProductService};
use stockbook_api::services::stock_in::{NewStockInEntry, StockInService};
use stockbook_api::services::wastage::{NewWastageEntry, WastageService};

fn events() -> (EventSender, tokio::sync::mpsc::Receiver<Event>) {
    channel(64)
}

async fn store() -> (TempDir, Arc<FlatFileDatastore>) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlatFileDatastore::open(dir.path()).await.unwrap());
    (dir, store)
}

fn receipt() -> NewStockInEntry {
    NewStockInEntry {
        product_name: "Green Tea".to_string(),
        category: Category::Tea,
        supplier_name: "Leaf & Co".to_string(),
        invoice_number: "INV-9".to_string(),
        batch_number: "B-7".to_string(),
        use_by_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        best_before: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        quantity: 10,
        package_size: dec!(0.5),
        price_per_unit: dec!(12.00),
        product_free_from_damage: true,
        labelling_match: true,
        product_status: ProductStatus::Accepted,
        checked_by: "MV".to_string(),
    }
}

#[tokio::test]
async fn stock_in_record_round_trips_and_derives_value_on_read() {
    let (_dir, store) = store().await;
    let (sender, _rx) = events();
    let service = StockInService::new(store.clone(), sender);

    let id = service.record(receipt()).await.unwrap();
    assert_eq!(id, 1);

    let records = service.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].row.product_name, "Green Tea");
    assert_eq!(records[0].row.product_status, "accepted");
    // 10 × 0.5 kg × 12.00
    assert_eq!(records[0].stock_value, dec!(60.00));
}

#[tokio::test]
async fn stock_in_rejects_non_positive_package_size() {
    let (_dir, store) = store().await;
    let (sender, _rx) = events();
    let service = StockInService::new(store.clone(), sender);

    let mut bad = receipt();
    bad.package_size = dec!(0);
    assert_matches!(
        service.record(bad).await,
        Err(ServiceError::Validation(_))
    );
    assert!(store.fetch_stock_in().await.unwrap().is_empty());
}

#[tokio::test]
async fn stock_in_delete_is_explicit_and_checked() {
    let (_dir, store) = store().await;
    let (sender, _rx) = events();
    let service = StockInService::new(store.clone(), sender);

    let id = service.record(receipt()).await.unwrap();
    service.delete(id).await.unwrap();
    assert_matches!(service.delete(id).await, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn wastage_total_cost_is_derived_at_write_time() {
    let (_dir, store) = store().await;
    let (sender, _rx) = events();
    let service = WastageService::new(store.clone(), sender);

    let entry = NewWastageEntry {
        date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        product_name: "Green Tea".to_string(),
        reason: "water damage".to_string(),
        batch_number: "B-7".to_string(),
        use_by_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        best_before: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        quantity: 3,
        package_size: dec!(0.5),
        avg_price_per_kg: dec!(10.00),
        checked_by: "MV".to_string(),
    };
    service.record(entry).await.unwrap();

    let rows = service.list().await.unwrap();
    assert_eq!(rows.len(), 1);
    // 10.00 × 3 × 0.5 kg
    assert_eq!(rows[0].total_cost, dec!(15.00));
}

#[tokio::test]
async fn wastage_requires_a_reason() {
    let (_dir, store) = store().await;
    let (sender, _rx) = events();
    let service = WastageService::new(store.clone(), sender);

    let entry = NewWastageEntry {
        date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        product_name: "Green Tea".to_string(),
        reason: String::new(),
        batch_number: "B-7".to_string(),
        use_by_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        best_before: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        quantity: 1,
        package_size: dec!(0.5),
        avg_price_per_kg: dec!(10.00),
        checked_by: "MV".to_string(),
    };
    let err = service.record(entry).await.unwrap_err();
    assert!(err.to_string().contains("Reason is required"));
}

#[tokio::test]
async fn catalog_add_list_delete() {
    let (_dir, store) = store().await;
    let (sender, _rx) = events();
    let service = ProductService::new(store.clone(), sender);

    let id = service
        .add(NewProduct {
            name: "Sencha 100g".to_string(),
            category: Category::Tea,
            sku: Some("SEN-100".to_string()),
            description: Some("First flush sencha".to_string()),
            price: dec!(8.50),
            stock_level: 25,
            size: Some("100g".to_string()),
            reorder_level: 5,
        })
        .await
        .unwrap();

    let products = service.list().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Sencha 100g");
    assert_eq!(products[0].category, "tea");
    assert_eq!(products[0].price, dec!(8.50));

    service.delete(id).await.unwrap();
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn catalog_rejects_negative_prices() {
    let (_dir, store) = store().await;
    let (sender, _rx) = events();
    let service = ProductService::new(store.clone(), sender);

    let result = service
        .add(NewProduct {
            name: "Sencha 100g".to_string(),
            category: Category::Tea,
            sku: None,
            description: None,
            price: dec!(-1.00),
            stock_level: 0,
            size: None,
            reorder_level: 0,
        })
        .await;
    assert_matches!(result, Err(ServiceError::Validation(_)));
}
