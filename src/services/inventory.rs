//! Stock aggregation across the location hierarchy, reorder evaluation,
//! and inter-location transfers.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::errors::ServiceError;
use crate::models::{AuditAction, Location, Product, StockRecord};
use crate::state::AppState;

/// A product's stock picture against its reorder threshold.
///
/// At most one of `shortage`/`surplus` is non-zero; both are zero exactly
/// when the total matches the reorder level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub total_quantity: i64,
    pub shortage: i64,
    pub surplus: i64,
}

/// Total stock for a product across all of its location records.
pub fn total_quantity(product: &Product) -> i64 {
    product.total_quantity()
}

/// Classifies a product against its reorder level.
pub fn evaluate(product: &Product) -> StockLevel {
    let total = product.total_quantity();
    let level = i64::from(product.reorder_level);
    StockLevel {
        total_quantity: total,
        shortage: (level - total).max(0),
        surplus: (total - level).max(0),
    }
}

/// Expands a set of selected location ids under the hierarchy rule:
/// selecting a main location pulls in all of its sub-locations, while
/// selecting a sub-location stands alone (siblings are not included).
/// Ids that match no known main location pass through unchanged.
pub fn effective_location_ids(locations: &[Location], selected: &[Uuid]) -> HashSet<Uuid> {
    let mut ids = HashSet::new();
    for &id in selected {
        if let Some(main) = locations.iter().find(|l| l.id == id) {
            ids.insert(main.id);
            ids.extend(main.sub_locations.iter().map(|s| s.id));
        } else {
            ids.insert(id);
        }
    }
    ids
}

/// Stock a product holds within a selected subset of locations, with the
/// hierarchy rule of [`effective_location_ids`] applied. Ids missing from
/// the product's records contribute 0.
pub fn quantity_in_locations(product: &Product, selected: &[Uuid], locations: &[Location]) -> i64 {
    let ids = effective_location_ids(locations, selected);
    product
        .locations
        .iter()
        .filter(|r| ids.contains(&r.location_id))
        .map(|r| i64::from(r.quantity))
        .sum()
}

/// One entry of a batch reorder-level edit.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct ReorderLevelEdit {
    pub product_id: Uuid,
    #[validate(range(min = 0))]
    pub reorder_level: i32,
}

/// Applies reorder-level edits to exactly the given products and reports
/// the recomputed stock picture for each. Products outside the edited set
/// are untouched. An unknown product id fails the whole batch.
#[instrument(skip(state, edits), fields(edits = edits.len()))]
pub fn set_reorder_levels(
    state: &AppState,
    edits: &[ReorderLevelEdit],
    actor: &str,
) -> Result<(AppState, Vec<(Uuid, StockLevel)>), ServiceError> {
    for edit in edits {
        edit.validate()?;
        state.product(edit.product_id)?;
    }

    let mut next = state.clone();
    let mut reports = Vec::with_capacity(edits.len());
    for edit in edits {
        let product = next.product_mut(edit.product_id)?;
        product.reorder_level = edit.reorder_level;
        reports.push((edit.product_id, evaluate(product)));
        next.record_audit(
            actor,
            AuditAction::ReorderLevelChanged,
            edit.product_id,
            format!("reorder level set to {}", edit.reorder_level),
        );
    }
    info!(count = edits.len(), "reorder levels updated");
    Ok((next, reports))
}

/// Request to move stock of one product between two locations.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct TransferStockRequest {
    pub product_id: Uuid,
    pub from_location_id: Uuid,
    pub to_location_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Moves stock between two locations of the same product. The source must
/// hold at least the requested quantity; the destination record is created
/// on demand.
#[instrument(skip(state), fields(product_id = %req.product_id))]
pub fn transfer_stock(
    state: &AppState,
    req: &TransferStockRequest,
    actor: &str,
) -> Result<AppState, ServiceError> {
    req.validate()?;
    if req.from_location_id == req.to_location_id {
        return Err(ServiceError::InvalidInput(
            "transfer source and destination are the same location".into(),
        ));
    }
    let from_name = state.location_display_name(req.from_location_id)?;
    let to_name = state.location_display_name(req.to_location_id)?;
    let to_is_sub = state.is_sub_location(req.to_location_id)?;

    let product = state.product(req.product_id)?;
    let on_hand = product.quantity_at(req.from_location_id);
    if on_hand < req.quantity {
        return Err(ServiceError::InsufficientStock(format!(
            "{} holds {} of {}, cannot move {}",
            from_name, on_hand, product.name, req.quantity
        )));
    }

    let mut next = state.clone();
    let product = next.product_mut(req.product_id)?;
    if let Some(record) = product.stock_record_mut(req.from_location_id) {
        record.quantity -= req.quantity;
    }
    match product.stock_record_mut(req.to_location_id) {
        Some(record) => {
            record.quantity = record.quantity.checked_add(req.quantity).ok_or_else(|| {
                ServiceError::InvalidInput(format!(
                    "moving {} into {} overflows the stock counter",
                    req.quantity, to_name
                ))
            })?;
        }
        None => product.locations.push(StockRecord {
            location_id: req.to_location_id,
            quantity: req.quantity,
            is_sub_location: to_is_sub,
        }),
    }
    next.record_audit(
        actor,
        AuditAction::StockTransferred,
        req.product_id,
        format!(
            "moved {} from {} to {}",
            req.quantity, from_name, to_name
        ),
    );
    info!(
        quantity = req.quantity,
        from = %from_name,
        to = %to_name,
        "stock transferred"
    );
    Ok(next)
}
