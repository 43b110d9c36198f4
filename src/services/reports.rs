//! Dashboard aggregations.
//!
//! Every summary is a pure function of a fetched snapshot; nothing is
//! cached between render passes. `ReportService` only fetches and applies
//! the filter before delegating, so the groupings stay unit-testable
//! without a backend.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::datastore::Datastore;
use crate::entities::{stock_in, stock_out};
use crate::errors::ServiceError;
use crate::models::ExpirationBucket;
use crate::services::pricing;

/// Which column a text search applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    OrderNumber,
    ProductName,
    BatchNumber,
    CustomerName,
    Sku,
}

/// Search and date-range filtering applied before aggregation, mirroring
/// the dashboard's search box and date pickers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalesFilter {
    pub search: Option<String>,
    pub search_field: Option<SearchField>,
    pub sold_from: Option<NaiveDate>,
    pub sold_to: Option<NaiveDate>,
    pub best_before_from: Option<NaiveDate>,
    pub best_before_to: Option<NaiveDate>,
}

impl SalesFilter {
    pub fn matches(&self, row: &stock_out::Model) -> bool {
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let haystack = match self.search_field.unwrap_or(SearchField::OrderNumber) {
                SearchField::OrderNumber => row.order_number.as_str(),
                SearchField::ProductName => row.product_name.as_str(),
                SearchField::BatchNumber => row.batch_number.as_str(),
                SearchField::CustomerName => row.customer_name.as_str(),
                SearchField::Sku => row.sku.as_deref().unwrap_or(""),
            };
            if !haystack.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        if self.sold_from.is_some_and(|from| row.date < from) {
            return false;
        }
        if self.sold_to.is_some_and(|to| row.date > to) {
            return false;
        }
        if self
            .best_before_from
            .is_some_and(|from| row.best_before < from)
        {
            return false;
        }
        if self.best_before_to.is_some_and(|to| row.best_before > to) {
            return false;
        }
        true
    }

    pub fn apply(&self, rows: Vec<stock_out::Model>) -> Vec<stock_out::Model> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}

/// The dashboard's quick-statistics row.
#[derive(Debug, Serialize)]
pub struct SalesStats {
    pub total_orders: usize,
    pub total_units: i64,
    pub total_revenue: Decimal,
    pub unique_customers: usize,
}

#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub order_number: String,
    pub date_of_sale: NaiveDate,
    pub customer_name: String,
    /// Distinct product names in first-seen order, comma separated.
    pub product_names: String,
    pub total_quantity: i64,
    pub total_price: Decimal,
    pub delivery_method: String,
}

#[derive(Debug, Serialize)]
pub struct ProductSales {
    pub product_name: String,
    pub quantity: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CustomerSales {
    pub customer_name: String,
    pub orders: usize,
    pub quantity: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MonthlySales {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: Decimal,
    pub orders: usize,
}

#[derive(Debug, Serialize)]
pub struct WeekdaySales {
    pub weekday: String,
    pub revenue: Decimal,
    pub orders: usize,
}

#[derive(Debug, Serialize)]
pub struct ExpirationSlice {
    pub bucket: ExpirationBucket,
    pub batches: usize,
    pub quantity: i64,
}

pub fn sales_stats(rows: &[stock_out::Model]) -> SalesStats {
    let orders: HashSet<&str> = rows.iter().map(|r| r.order_number.as_str()).collect();
    let customers: HashSet<&str> = rows.iter().map(|r| r.customer_name.as_str()).collect();
    SalesStats {
        total_orders: orders.len(),
        total_units: rows.iter().map(|r| i64::from(r.quantity)).sum(),
        total_revenue: rows.iter().map(|r| r.total_price).sum(),
        unique_customers: customers.len(),
    }
}

/// Groups rows by order number: first date, first customer, concatenated
/// distinct product names, summed quantity and total, first delivery
/// method. Orders appear in first-seen row order.
pub fn orders_overview(rows: &[stock_out::Model]) -> Vec<OrderSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut seen_products: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut summaries: Vec<OrderSummary> = Vec::new();

    for row in rows {
        let pos = *index.entry(row.order_number.as_str()).or_insert_with(|| {
            summaries.push(OrderSummary {
                order_number: row.order_number.clone(),
                date_of_sale: row.date,
                customer_name: row.customer_name.clone(),
                product_names: String::new(),
                total_quantity: 0,
                total_price: Decimal::ZERO,
                delivery_method: row.delivery_method.clone(),
            });
            summaries.len() - 1
        });

        let summary = &mut summaries[pos];
        summary.total_quantity += i64::from(row.quantity);
        summary.total_price += row.total_price;
        let products = seen_products.entry(row.order_number.as_str()).or_default();
        if products.insert(row.product_name.as_str()) {
            if !summary.product_names.is_empty() {
                summary.product_names.push_str(", ");
            }
            summary.product_names.push_str(&row.product_name);
        }
    }

    summaries
}

/// Summed quantity and revenue per product, descending by revenue.
pub fn sales_by_product(rows: &[stock_out::Model]) -> Vec<ProductSales> {
    let mut acc: HashMap<&str, (i64, Decimal)> = HashMap::new();
    for row in rows {
        let entry = acc.entry(row.product_name.as_str()).or_default();
        entry.0 += i64::from(row.quantity);
        entry.1 += row.total_price;
    }
    let mut out: Vec<ProductSales> = acc
        .into_iter()
        .map(|(name, (quantity, revenue))| ProductSales {
            product_name: name.to_string(),
            quantity,
            revenue,
        })
        .collect();
    out.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    out
}

pub fn sales_by_customer(rows: &[stock_out::Model]) -> Vec<CustomerSales> {
    let mut acc: HashMap<&str, (HashSet<&str>, i64, Decimal)> = HashMap::new();
    for row in rows {
        let entry = acc.entry(row.customer_name.as_str()).or_default();
        entry.0.insert(row.order_number.as_str());
        entry.1 += i64::from(row.quantity);
        entry.2 += row.total_price;
    }
    let mut out: Vec<CustomerSales> = acc
        .into_iter()
        .map(|(name, (orders, quantity, revenue))| CustomerSales {
            customer_name: name.to_string(),
            orders: orders.len(),
            quantity,
            revenue,
        })
        .collect();
    out.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.customer_name.cmp(&b.customer_name))
    });
    out
}

/// Revenue and distinct order count per `YYYY-MM`, ascending by month.
/// Months with no sales are absent (an unbounded axis cannot be
/// zero-filled).
pub fn sales_by_month(rows: &[stock_out::Model]) -> Vec<MonthlySales> {
    let mut acc: BTreeMap<String, (Decimal, HashSet<&str>)> = BTreeMap::new();
    for row in rows {
        let month = format!("{:04}-{:02}", row.date.year(), row.date.month());
        let entry = acc.entry(month).or_default();
        entry.0 += row.total_price;
        entry.1.insert(row.order_number.as_str());
    }
    acc.into_iter()
        .map(|(month, (revenue, orders))| MonthlySales {
            month,
            revenue,
            orders: orders.len(),
        })
        .collect()
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Revenue and distinct order count per day of week, always seven rows in
/// calendar order (Monday…Sunday) with zero-filled gaps, regardless of the
/// order the data arrived in.
pub fn sales_by_weekday(rows: &[stock_out::Model]) -> Vec<WeekdaySales> {
    let mut acc: HashMap<Weekday, (Decimal, HashSet<&str>)> = HashMap::new();
    for row in rows {
        let entry = acc.entry(row.date.weekday()).or_default();
        entry.0 += row.total_price;
        entry.1.insert(row.order_number.as_str());
    }
    WEEK.iter()
        .map(|weekday| {
            let (revenue, orders) = acc
                .get(weekday)
                .map(|(revenue, orders)| (*revenue, orders.len()))
                .unwrap_or((Decimal::ZERO, 0));
            WeekdaySales {
                weekday: weekday_label(*weekday).to_string(),
                revenue,
                orders,
            }
        })
        .collect()
}

/// Batch counts and quantities per shelf-life bucket, always four slices in
/// the fixed Expired → ExpiringSoon → MediumTerm → LongTerm order, even
/// when a bucket is empty.
pub fn expiration_overview(rows: &[stock_in::Model], today: NaiveDate) -> Vec<ExpirationSlice> {
    let mut acc: HashMap<ExpirationBucket, (usize, i64)> = HashMap::new();
    for row in rows {
        let bucket = ExpirationBucket::classify(pricing::days_until(row.best_before, today));
        let entry = acc.entry(bucket).or_default();
        entry.0 += 1;
        entry.1 += i64::from(row.quantity);
    }
    ExpirationBucket::iter()
        .map(|bucket| {
            let (batches, quantity) = acc.get(&bucket).copied().unwrap_or((0, 0));
            ExpirationSlice {
                bucket,
                batches,
                quantity,
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn Datastore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    async fn sales_snapshot(
        &self,
        filter: &SalesFilter,
    ) -> Result<Vec<stock_out::Model>, ServiceError> {
        Ok(filter.apply(self.store.fetch_sales().await?))
    }

    pub async fn stats(&self, filter: &SalesFilter) -> Result<SalesStats, ServiceError> {
        Ok(sales_stats(&self.sales_snapshot(filter).await?))
    }

    pub async fn overview(&self, filter: &SalesFilter) -> Result<Vec<OrderSummary>, ServiceError> {
        Ok(orders_overview(&self.sales_snapshot(filter).await?))
    }

    pub async fn by_product(
        &self,
        filter: &SalesFilter,
    ) -> Result<Vec<ProductSales>, ServiceError> {
        Ok(sales_by_product(&self.sales_snapshot(filter).await?))
    }

    pub async fn by_customer(
        &self,
        filter: &SalesFilter,
    ) -> Result<Vec<CustomerSales>, ServiceError> {
        Ok(sales_by_customer(&self.sales_snapshot(filter).await?))
    }

    pub async fn monthly(&self, filter: &SalesFilter) -> Result<Vec<MonthlySales>, ServiceError> {
        Ok(sales_by_month(&self.sales_snapshot(filter).await?))
    }

    pub async fn weekday(&self, filter: &SalesFilter) -> Result<Vec<WeekdaySales>, ServiceError> {
        Ok(sales_by_weekday(&self.sales_snapshot(filter).await?))
    }

    pub async fn expiration(&self) -> Result<Vec<ExpirationSlice>, ServiceError> {
        let rows = self.store.fetch_stock_in().await?;
        Ok(expiration_overview(&rows, Utc::now().date_naive()))
    }
}
