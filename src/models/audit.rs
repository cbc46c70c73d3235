use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of workflow mutation an audit entry records.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum AuditAction {
    AdjustmentSubmitted,
    AdjustmentApproved,
    AdjustmentRejected,
    StockTransferred,
    ReorderLevelChanged,
    ShipmentLogged,
    ShipmentReceived,
    PriceAssigned,
    PriceUpdated,
    ProductCreated,
    ProductUpdated,
    CustomerCreated,
    CustomerUpdated,
}

/// One line of the audit trail. Every mutating service operation appends
/// exactly one entry per affected entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub actor: String,
    pub action: AuditAction,
    /// Id of the entity the action touched (adjustment, product, ...).
    pub entity_id: Uuid,
    pub detail: String,
    pub created_at: DateTime<Utc>,
}
