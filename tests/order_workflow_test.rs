//! End-to-end order workflow against the flat-file backend in a temp dir.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tempfile::TempDir;
use tokio::sync::mpsc;

use stockbook_api::datastore::{Datastore, FlatFileDatastore};
use stockbook_api::errors::ServiceError;
use stockbook_api::events::{Event, EventSender};
use stockbook_api::models::{Category, DeliveryMethod};
use stockbook_api::services::drafts::NewLineItem;
use stockbook_api::services::orders::{OrderHeader, OrderService, WorkflowMode};

struct TestRig {
    _dir: TempDir,
    store: Arc<FlatFileDatastore>,
    orders: OrderService,
    events: mpsc::Receiver<Event>,
}

async fn rig() -> TestRig {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlatFileDatastore::open(dir.path()).await.unwrap());
    let (tx, events) = mpsc::channel(64);
    let orders = OrderService::new(store.clone(), EventSender::new(tx));
    TestRig {
        _dir: dir,
        store,
        orders,
        events,
    }
}

fn line_item(product_name: &str, quantity: i32, price: rust_decimal::Decimal) -> NewLineItem {
    NewLineItem {
        product_name: product_name.to_string(),
        category: Category::Tea,
        size: Some("100g".to_string()),
        sku: Some("SKU-1".to_string()),
        batch_number: "B-7".to_string(),
        quantity,
        price_per_unit: price,
        best_before: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        production_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        labelling_match: true,
        checked_by: "MV".to_string(),
    }
}

fn header(order_number: &str) -> OrderHeader {
    OrderHeader {
        date_of_sale: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        customer_name: "Jane".to_string(),
        delivery_method: DeliveryMethod::Courier,
        order_number: order_number.to_string(),
    }
}

/// Submits the canonical two-item order (Green Tea ×2 @5.00, Mug ×1 @12.00).
async fn submit_sample_order(rig: &TestRig, order_number: &str) {
    let session = rig.orders.open_session();
    let workflow = rig.orders.workflow(session).unwrap();
    let mut workflow = workflow.lock().await;
    workflow
        .add_item(line_item("Green Tea", 2, dec!(5.00)))
        .unwrap();
    workflow.add_item(line_item("Mug", 1, dec!(12.00))).unwrap();
    workflow.submit(header(order_number)).await.unwrap();
}

#[tokio::test]
async fn submit_persists_rows_with_recomputed_totals() {
    let rig = rig().await;
    let session = rig.orders.open_session();
    let workflow = rig.orders.workflow(session).unwrap();
    let mut workflow = workflow.lock().await;

    workflow
        .add_item(line_item("Green Tea", 2, dec!(5.00)))
        .unwrap();
    workflow.add_item(line_item("Mug", 1, dec!(12.00))).unwrap();
    assert_eq!(workflow.order_total(), dec!(22.00));

    let order_number = workflow.submit(header("ORD-001")).await.unwrap();
    assert_eq!(order_number, "ORD-001");

    let rows = rig.store.fetch_order("ORD-001").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].product_name, "Green Tea");
    assert_eq!(rows[0].total_price, dec!(10.00));
    assert_eq!(rows[1].product_name, "Mug");
    assert_eq!(rows[1].total_price, dec!(12.00));

    // Header fields are merged onto every row.
    for row in &rows {
        assert_eq!(row.customer_name, "Jane");
        assert_eq!(row.delivery_method, "Courier");
        assert_eq!(row.order_number, "ORD-001");
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    // Draft cleared, back to creation mode.
    assert!(workflow.items().is_empty());
    assert_eq!(*workflow.mode(), WorkflowMode::Creating);
}

#[tokio::test]
async fn submit_emits_a_data_changed_event() {
    let mut rig = rig().await;
    submit_sample_order(&rig, "ORD-001").await;

    assert_matches!(
        rig.events.recv().await,
        Some(Event::OrderSubmitted { order_number, line_count: 2 }) if order_number == "ORD-001"
    );
}

#[tokio::test]
async fn begin_edit_reproduces_the_last_submitted_items() {
    let rig = rig().await;
    submit_sample_order(&rig, "ORD-001").await;

    let session = rig.orders.open_session();
    let workflow = rig.orders.workflow(session).unwrap();
    let mut workflow = workflow.lock().await;
    workflow.begin_edit("ORD-001").await.unwrap();

    assert_eq!(
        *workflow.mode(),
        WorkflowMode::Editing {
            order_number: "ORD-001".to_string()
        }
    );
    let items = workflow.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].product_name, "Green Tea");
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].total_price, dec!(10.00));
    assert_eq!(items[1].product_name, "Mug");
    assert_eq!(workflow.order_total(), dec!(22.00));
}

#[tokio::test]
async fn edit_remove_and_submit_leaves_exactly_the_kept_rows() {
    let rig = rig().await;
    submit_sample_order(&rig, "ORD-001").await;

    let session = rig.orders.open_session();
    let workflow = rig.orders.workflow(session).unwrap();
    let mut workflow = workflow.lock().await;
    workflow.begin_edit("ORD-001").await.unwrap();

    let mug_position = workflow
        .items()
        .iter()
        .position(|item| item.product_name == "Mug")
        .unwrap();
    workflow.remove_item(mug_position).unwrap();
    workflow.submit(header("ORD-001")).await.unwrap();

    let rows = rig.store.fetch_order("ORD-001").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].product_name, "Green Tea");
    assert_eq!(rows[0].total_price, dec!(10.00));
}

#[tokio::test]
async fn submit_with_empty_draft_fails_and_makes_no_store_call() {
    let rig = rig().await;
    let session = rig.orders.open_session();
    let workflow = rig.orders.workflow(session).unwrap();
    let mut workflow = workflow.lock().await;

    assert_matches!(
        workflow.submit(header("ORD-001")).await,
        Err(ServiceError::EmptyOrder)
    );
    assert!(rig.store.fetch_sales().await.unwrap().is_empty());
}

#[tokio::test]
async fn begin_edit_of_unknown_order_is_not_found() {
    let rig = rig().await;
    let session = rig.orders.open_session();
    let workflow = rig.orders.workflow(session).unwrap();
    let mut workflow = workflow.lock().await;

    assert_matches!(
        workflow.begin_edit("ORD-404").await,
        Err(ServiceError::NotFound(_))
    );
    // Fell back to an empty creation draft.
    assert_eq!(*workflow.mode(), WorkflowMode::Creating);
    assert!(workflow.items().is_empty());
}

#[tokio::test]
async fn failed_submit_preserves_the_draft_for_retry() {
    let rig = rig().await;
    let session = rig.orders.open_session();
    let workflow = rig.orders.workflow(session).unwrap();
    let mut workflow = workflow.lock().await;
    workflow
        .add_item(line_item("Green Tea", 2, dec!(5.00)))
        .unwrap();

    let mut bad_header = header("ORD-001");
    bad_header.customer_name.clear();
    assert_matches!(
        workflow.submit(bad_header).await,
        Err(ServiceError::Validation(_))
    );

    // Nothing persisted, nothing lost: fixing the header succeeds.
    assert_eq!(workflow.items().len(), 1);
    assert!(rig.store.fetch_sales().await.unwrap().is_empty());
    workflow.submit(header("ORD-001")).await.unwrap();
    assert_eq!(rig.store.fetch_order("ORD-001").await.unwrap().len(), 1);
}

#[tokio::test]
async fn editing_cannot_change_the_order_number() {
    let rig = rig().await;
    submit_sample_order(&rig, "ORD-001").await;

    let session = rig.orders.open_session();
    let workflow = rig.orders.workflow(session).unwrap();
    let mut workflow = workflow.lock().await;
    workflow.begin_edit("ORD-001").await.unwrap();

    assert_matches!(
        workflow.submit(header("ORD-002")).await,
        Err(ServiceError::Validation(_))
    );
    // The original order is untouched.
    assert_eq!(rig.store.fetch_order("ORD-001").await.unwrap().len(), 2);
}

#[tokio::test]
async fn cancel_discards_edit_state_and_returns_to_creating() {
    let rig = rig().await;
    submit_sample_order(&rig, "ORD-001").await;

    let session = rig.orders.open_session();
    let workflow = rig.orders.workflow(session).unwrap();
    let mut workflow = workflow.lock().await;
    workflow.begin_edit("ORD-001").await.unwrap();
    workflow.cancel();

    assert_eq!(*workflow.mode(), WorkflowMode::Creating);
    assert!(workflow.items().is_empty());
    // Cancelling an edit leaves the persisted order alone.
    assert_eq!(rig.store.fetch_order("ORD-001").await.unwrap().len(), 2);
}

#[tokio::test]
async fn delete_order_removes_header_and_items_as_a_unit() {
    let rig = rig().await;
    submit_sample_order(&rig, "ORD-001").await;
    submit_sample_order(&rig, "ORD-002").await;

    assert_eq!(rig.orders.delete_order("ORD-001").await.unwrap(), 2);
    assert!(rig.store.fetch_order("ORD-001").await.unwrap().is_empty());
    assert_eq!(rig.store.fetch_order("ORD-002").await.unwrap().len(), 2);

    assert_matches!(
        rig.orders.delete_order("ORD-001").await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn get_order_returns_header_summary_and_items() {
    let rig = rig().await;
    submit_sample_order(&rig, "ORD-001").await;

    let details = rig.orders.get_order("ORD-001").await.unwrap();
    assert_eq!(details.order_number, "ORD-001");
    assert_eq!(details.customer_name, "Jane");
    assert_eq!(details.delivery_method, "Courier");
    assert_eq!(details.total_price, dec!(22.00));
    assert_eq!(details.items.len(), 2);
}

#[tokio::test]
async fn concurrent_sessions_hold_independent_drafts_and_last_submit_wins() {
    let rig = rig().await;
    submit_sample_order(&rig, "ORD-001").await;

    let first = rig.orders.workflow(rig.orders.open_session()).unwrap();
    let second = rig.orders.workflow(rig.orders.open_session()).unwrap();

    let mut first = first.lock().await;
    let mut second = second.lock().await;
    first.begin_edit("ORD-001").await.unwrap();
    second.begin_edit("ORD-001").await.unwrap();

    first.remove_item(1).unwrap();
    first.submit(header("ORD-001")).await.unwrap();

    // The second session still holds both items and overwrites the first
    // session's edit on submit.
    assert_eq!(second.items().len(), 2);
    second.remove_item(0).unwrap();
    second.submit(header("ORD-001")).await.unwrap();

    let rows = rig.store.fetch_order("ORD-001").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].product_name, "Mug");
}

#[tokio::test]
async fn closed_sessions_are_gone() {
    let rig = rig().await;
    let session = rig.orders.open_session();
    assert!(rig.orders.workflow(session).is_ok());
    assert!(rig.orders.close_session(session));
    assert_matches!(
        rig.orders.workflow(session),
        Err(ServiceError::NotFound(_))
    );
}
