use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer-specific pricing overlay for one `(customer, product)` pair.
///
/// At most one overlay may exist per pair. When both fields are present the
/// special price wins over the percentage discount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerPrice {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    /// Absolute price replacing the wholesale price outright.
    pub special_price: Option<Decimal>,
    /// Percentage discount off the wholesale price, 0-100.
    pub discount: Option<Decimal>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CustomerPrice {
    /// Resolves the price this overlay yields on top of a wholesale price.
    pub fn effective_price(&self, wholesale_price: Decimal) -> Decimal {
        if let Some(price) = self.special_price {
            price
        } else if let Some(discount) = self.discount {
            wholesale_price * (Decimal::ONE - discount / dec!(100))
        } else {
            wholesale_price
        }
    }
}
