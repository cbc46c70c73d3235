//! The in-memory state snapshot every operation works against.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::{
    AuditAction, AuditEntry, Customer, CustomerPrice, IncomingShipment, Location, Product,
    StockAdjustment,
};

/// Complete application state.
///
/// Services never mutate a caller's snapshot: they clone it, apply the
/// change, and hand back the new value. Cloning is cheap at the scale this
/// engine targets (an admin dashboard's working set).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppState {
    pub locations: Vec<Location>,
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub customer_prices: Vec<CustomerPrice>,
    pub adjustments: Vec<StockAdjustment>,
    pub shipments: Vec<IncomingShipment>,
    pub audit_log: Vec<AuditEntry>,
}

impl AppState {
    pub fn product(&self, id: Uuid) -> Result<&Product, ServiceError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::not_found("product", id))
    }

    pub fn product_mut(&mut self, id: Uuid) -> Result<&mut Product, ServiceError> {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::not_found("product", id))
    }

    pub fn customer(&self, id: Uuid) -> Result<&Customer, ServiceError> {
        self.customers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::not_found("customer", id))
    }

    pub fn customer_mut(&mut self, id: Uuid) -> Result<&mut Customer, ServiceError> {
        self.customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::not_found("customer", id))
    }

    /// Looks up a main location by id.
    pub fn location(&self, id: Uuid) -> Result<&Location, ServiceError> {
        self.locations
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| ServiceError::not_found("location", id))
    }

    pub fn adjustment(&self, id: Uuid) -> Result<&StockAdjustment, ServiceError> {
        self.adjustments
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| ServiceError::not_found("stock adjustment", id))
    }

    pub fn adjustment_mut(&mut self, id: Uuid) -> Result<&mut StockAdjustment, ServiceError> {
        self.adjustments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ServiceError::not_found("stock adjustment", id))
    }

    pub fn shipment(&self, id: Uuid) -> Result<&IncomingShipment, ServiceError> {
        self.shipments
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ServiceError::not_found("incoming shipment", id))
    }

    pub fn shipment_mut(&mut self, id: Uuid) -> Result<&mut IncomingShipment, ServiceError> {
        self.shipments
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ServiceError::not_found("incoming shipment", id))
    }

    /// True when `id` names a main location or any sub-location.
    pub fn is_known_location(&self, id: Uuid) -> bool {
        self.locations.iter().any(|l| l.owns(id))
    }

    /// Whether a known location id refers to a sub-location.
    pub fn is_sub_location(&self, id: Uuid) -> Result<bool, ServiceError> {
        for location in &self.locations {
            if location.id == id {
                return Ok(false);
            }
            if location.sub_location(id).is_some() {
                return Ok(true);
            }
        }
        Err(ServiceError::not_found("location", id))
    }

    /// Human-readable name for a main or sub-location id.
    pub fn location_display_name(&self, id: Uuid) -> Result<String, ServiceError> {
        for location in &self.locations {
            if location.id == id {
                return Ok(location.name.clone());
            }
            if let Some(sub) = location.sub_location(id) {
                return Ok(format!("{} / {}", location.name, sub.name));
            }
        }
        Err(ServiceError::not_found("location", id))
    }

    /// Appends an audit entry for a mutation that just happened on `self`.
    pub(crate) fn record_audit(
        &mut self,
        actor: &str,
        action: AuditAction,
        entity_id: Uuid,
        detail: impl Into<String>,
    ) {
        self.audit_log.push(AuditEntry {
            id: Uuid::new_v4(),
            actor: actor.to_string(),
            action,
            entity_id,
            detail: detail.into(),
            created_at: Utc::now(),
        });
    }
}
