pub mod drafts;
pub mod orders;
pub mod pricing;
pub mod products;
pub mod reports;
pub mod stock_in;
pub mod wastage;

use rust_decimal::Decimal;
use validator::ValidationError;

/// Minimum accepted unit price (and average price per kg).
pub(crate) fn validate_unit_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::new(1, 2) {
        let mut err = ValidationError::new("price_per_unit");
        err.message = Some("Price must be at least 0.01".into());
        return Err(err);
    }
    Ok(())
}

/// Package sizes are weights in kilograms and must be strictly positive.
pub(crate) fn validate_package_size(size: &Decimal) -> Result<(), ValidationError> {
    if *size <= Decimal::ZERO {
        let mut err = ValidationError::new("package_size");
        err.message = Some("Package size must be greater than zero".into());
        return Err(err);
    }
    Ok(())
}

/// Catalog prices may be zero (freebies) but never negative.
pub(crate) fn validate_non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        let mut err = ValidationError::new("price");
        err.message = Some("Price cannot be negative".into());
        return Err(err);
    }
    Ok(())
}
