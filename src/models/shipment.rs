use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of an incoming shipment. `Received` is terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum ShipmentStatus {
    InTransit,
    Received,
}

/// One product line on an incoming shipment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
}

/// An inbound delivery headed for a single location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncomingShipment {
    pub id: Uuid,
    /// Supplier reference, e.g. a packing slip or PO number.
    pub reference: String,
    pub supplier: String,
    pub location_id: Uuid,
    pub location_name: String,
    pub lines: Vec<ShipmentLine>,
    pub status: ShipmentStatus,
    pub expected_at: DateTime<Utc>,
    pub received_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
