pub mod adjustment;
pub mod audit;
pub mod customer;
pub mod customer_price;
pub mod location;
pub mod product;
pub mod shipment;

pub use adjustment::{
    AdjustmentLine, AdjustmentReason, AdjustmentStatus, AdjustmentType, StockAdjustment,
};
pub use audit::{AuditAction, AuditEntry};
pub use customer::Customer;
pub use customer_price::CustomerPrice;
pub use location::{Location, LocationKind, SubLocation};
pub use product::{Product, StockRecord, FX_RATE};
pub use shipment::{IncomingShipment, ShipmentLine, ShipmentStatus};
