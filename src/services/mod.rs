pub mod adjustments;
pub mod customers;
pub mod inventory;
pub mod pricing;
pub mod products;
pub mod receiving;
