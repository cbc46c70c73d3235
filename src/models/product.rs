use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::media::ImageData;

/// Fixed conversion rate between the local retail price and its USD
/// counterpart across the whole catalog.
pub const FX_RATE: Decimal = dec!(17.5);

/// Allowed drift between `retail_price` and `retail_price_usd * FX_RATE`.
/// The dataset rounds retail prices to whole currency units.
pub const FX_TOLERANCE: Decimal = dec!(0.5);

/// Per-location stock entry. A product holds at most one record per
/// distinct location id, main or sub.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub location_id: Uuid,
    pub quantity: i32,
    pub is_sub_location: bool,
}

/// A catalog product with price tiers and per-location stock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    pub id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub image: Option<ImageData>,
    pub cost_price: Decimal,
    pub wholesale_price: Decimal,
    pub retail_price: Decimal,
    pub retail_price_usd: Decimal,
    pub reorder_level: i32,
    pub locations: Vec<StockRecord>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Total stock across every location record. Empty set yields 0 and the
    /// result does not depend on record ordering.
    pub fn total_quantity(&self) -> i64 {
        self.locations.iter().map(|r| i64::from(r.quantity)).sum()
    }

    /// On-hand quantity at a single location id, 0 when no record exists.
    pub fn quantity_at(&self, location_id: Uuid) -> i32 {
        self.stock_record(location_id).map_or(0, |r| r.quantity)
    }

    pub fn stock_record(&self, location_id: Uuid) -> Option<&StockRecord> {
        self.locations.iter().find(|r| r.location_id == location_id)
    }

    pub fn stock_record_mut(&mut self, location_id: Uuid) -> Option<&mut StockRecord> {
        self.locations
            .iter_mut()
            .find(|r| r.location_id == location_id)
    }

    /// Whether the two retail prices agree under [`FX_RATE`] within
    /// [`FX_TOLERANCE`].
    pub fn retail_prices_consistent(&self) -> bool {
        (self.retail_price - self.retail_price_usd * FX_RATE).abs() <= FX_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_with(records: Vec<StockRecord>) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Test".into(),
            category: "Misc".into(),
            image: None,
            cost_price: dec!(10),
            wholesale_price: dec!(12),
            retail_price: dec!(175),
            retail_price_usd: dec!(10),
            reorder_level: 0,
            locations: records,
            note: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn total_quantity_sums_all_records() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let product = product_with(vec![
            StockRecord {
                location_id: a,
                quantity: 3,
                is_sub_location: false,
            },
            StockRecord {
                location_id: b,
                quantity: 2,
                is_sub_location: true,
            },
        ]);
        assert_eq!(product.total_quantity(), 5);
        assert_eq!(product.quantity_at(a), 3);
        assert_eq!(product.quantity_at(Uuid::new_v4()), 0);
    }

    #[test]
    fn fx_consistency_allows_rounding_drift() {
        let mut product = product_with(vec![]);
        assert!(product.retail_prices_consistent());
        product.retail_price = dec!(175.4);
        assert!(product.retail_prices_consistent());
        product.retail_price = dec!(180);
        assert!(!product.retail_prices_consistent());
    }
}
