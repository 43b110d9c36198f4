//! Pure derived-field arithmetic.
//!
//! Derived monetary fields are always recomputed from their inputs at write
//! time; these helpers are the only place that math lives, so add-time and
//! report-time values cannot drift apart. All functions are side-effect
//! free and safe to call repeatedly.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// quantity × unit price. Callers validate the inputs at the boundary
/// (quantity ≥ 1, unit price ≥ 0.01) before reaching this function.
pub fn line_total(quantity: i32, unit_price: Decimal) -> Decimal {
    Decimal::from(quantity) * unit_price
}

/// quantity × package size (kg) × price per unit.
pub fn stock_value(quantity: i32, package_size: Decimal, price_per_unit: Decimal) -> Decimal {
    Decimal::from(quantity) * package_size * price_per_unit
}

/// average price per kg × quantity × package size (kg).
pub fn wastage_cost(avg_price_per_kg: Decimal, quantity: i32, package_size: Decimal) -> Decimal {
    avg_price_per_kg * Decimal::from(quantity) * package_size
}

/// Whole days from `today` until `date`; negative once `date` has passed.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}
