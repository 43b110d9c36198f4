//! Domain enums shared across entities, services and handlers.
//!
//! Values are stored as strings at the persistence boundary and mapped back
//! through `FromStr` at the edges.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Product category carried by catalog entries and stock movements.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    Tea,
    Gear,
    Books,
}

/// How a sales order leaves the premises.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum DeliveryMethod {
    Courier,
    Pickup,
    Post,
}

/// Outcome of the goods-receipt inspection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProductStatus {
    Accepted,
    Rejected,
}

/// Shelf-life classification of a stocked batch. Declaration order is the
/// fixed display order for reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationBucket {
    Expired,
    ExpiringSoon,
    MediumTerm,
    LongTerm,
}

impl ExpirationBucket {
    /// Buckets by days remaining until best-before. Boundaries (0, 30, 90)
    /// are lower-bound inclusive.
    pub fn classify(days_remaining: i64) -> Self {
        if days_remaining < 0 {
            Self::Expired
        } else if days_remaining < 30 {
            Self::ExpiringSoon
        } else if days_remaining < 90 {
            Self::MediumTerm
        } else {
            Self::LongTerm
        }
    }
}
