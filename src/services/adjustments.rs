//! The stock-adjustment approval workflow.
//!
//! Adjustments are authored against a single location, submitted into
//! `Pending`, and then either approved (stock is applied atomically) or
//! rejected (no stock mutation). Approval may be scoped to a subset of
//! lines; deselected lines are dropped from the persisted document.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::errors::ServiceError;
use crate::media::ImageData;
use crate::models::adjustment::{reason_by_id, REASON_OTHER};
use crate::models::{
    AdjustmentLine, AdjustmentStatus, AdjustmentType, AuditAction, StockAdjustment, StockRecord,
};
use crate::state::AppState;

/// A line of a new adjustment as entered by the submitter.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct NewAdjustmentLine {
    pub product_id: Uuid,
    pub adjustment_type: AdjustmentType,
    /// Magnitude of the change; must be positive.
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub reason_id: Uuid,
    #[validate(length(max = 500))]
    pub custom_reason: Option<String>,
    pub proof: Option<ImageData>,
}

/// Request to submit a new stock adjustment for review.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct SubmitAdjustmentRequest {
    pub location_id: Uuid,
    #[validate]
    pub lines: Vec<NewAdjustmentLine>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Validates and submits an adjustment, producing a `Pending` document.
///
/// Each product may appear on at most one line, so the per-line stock check
/// is also the per-product one. A `Remove` line whose quantity exceeds the
/// on-hand count at the target location fails the whole submission;
/// quantities are never clamped.
#[instrument(skip(state, req), fields(location_id = %req.location_id, lines = req.lines.len()))]
pub fn submit(
    state: &AppState,
    req: &SubmitAdjustmentRequest,
    actor: &str,
) -> Result<(AppState, Uuid), ServiceError> {
    req.validate()?;
    if req.lines.is_empty() {
        return Err(ServiceError::ValidationError("no products selected".into()));
    }
    let location_name = state.location_display_name(req.location_id)?;

    let mut seen = HashSet::with_capacity(req.lines.len());
    let mut lines = Vec::with_capacity(req.lines.len());
    for line in &req.lines {
        let product = state.product(line.product_id)?;
        if !seen.insert(line.product_id) {
            return Err(ServiceError::ValidationError(format!(
                "{} appears on more than one line; combine the quantities",
                product.name
            )));
        }
        let reason = reason_by_id(line.reason_id)
            .filter(|r| r.is_active)
            .ok_or_else(|| {
                ServiceError::InvalidInput(format!(
                    "unknown or inactive adjustment reason {}",
                    line.reason_id
                ))
            })?;
        if reason.code == REASON_OTHER
            && line
                .custom_reason
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
        {
            return Err(ServiceError::ValidationError(
                "a custom reason is required when the reason is Other".into(),
            ));
        }

        let previous_quantity = product.quantity_at(req.location_id);
        let new_quantity = match line.adjustment_type {
            AdjustmentType::Add => previous_quantity
                .checked_add(line.quantity)
                .ok_or_else(|| {
                    ServiceError::InvalidInput(format!(
                        "adding {} of {} overflows the stock counter",
                        line.quantity, product.name
                    ))
                })?,
            AdjustmentType::Remove => {
                if line.quantity > previous_quantity {
                    warn!(
                        product = %product.name,
                        on_hand = previous_quantity,
                        requested = line.quantity,
                        "adjustment would overdraw stock"
                    );
                    return Err(ServiceError::InvalidOperation(format!(
                        "removing {} of {} at {} would result in negative quantity (on hand: {})",
                        line.quantity, product.name, location_name, previous_quantity
                    )));
                }
                previous_quantity - line.quantity
            }
        };

        lines.push(AdjustmentLine {
            product_id: product.id,
            product_name: product.name.clone(),
            product_image: product.image.clone(),
            category: product.category.clone(),
            adjustment_type: line.adjustment_type,
            quantity: line.quantity,
            previous_quantity,
            new_quantity,
            reason_id: line.reason_id,
            custom_reason: line.custom_reason.clone(),
            proof: line.proof.clone(),
        });
    }

    let id = Uuid::new_v4();
    let line_count = lines.len();
    let adjustment = StockAdjustment {
        id,
        location_id: req.location_id,
        location_name: location_name.clone(),
        lines,
        status: AdjustmentStatus::Pending,
        note: req.note.clone(),
        created_at: Utc::now(),
        completed_at: None,
        approved_by: None,
        approved_at: None,
        rejected_by: None,
        rejected_at: None,
    };

    let mut next = state.clone();
    next.adjustments.push(adjustment);
    next.record_audit(
        actor,
        AuditAction::AdjustmentSubmitted,
        id,
        format!("{} line(s) at {}", line_count, location_name),
    );
    info!(adjustment_id = %id, "stock adjustment submitted");
    Ok((next, id))
}

/// Approves a pending adjustment and applies its lines to stock.
///
/// When `selected_product_ids` is given, only the matching lines survive;
/// the rest are dropped from the persisted document. The surviving lines
/// are re-validated against current stock before any mutation, summed per
/// product, so approval is all-or-nothing and can never drive a stock
/// record negative.
#[instrument(skip(state, note))]
pub fn approve(
    state: &AppState,
    adjustment_id: Uuid,
    actor: &str,
    selected_product_ids: Option<&[Uuid]>,
    note: Option<String>,
) -> Result<AppState, ServiceError> {
    let adjustment = state.adjustment(adjustment_id)?;
    if adjustment.status != AdjustmentStatus::Pending {
        return Err(ServiceError::InvalidStatus(format!(
            "adjustment {} is {}; only pending adjustments can be approved",
            adjustment_id, adjustment.status
        )));
    }

    let surviving: Vec<AdjustmentLine> = match selected_product_ids {
        Some(selected) => adjustment
            .lines
            .iter()
            .filter(|l| selected.contains(&l.product_id))
            .cloned()
            .collect(),
        None => adjustment.lines.clone(),
    };
    if surviving.is_empty() {
        return Err(ServiceError::ValidationError(
            "no items selected for approval".into(),
        ));
    }

    // Stock may have moved since submission; validate the summed delta per
    // product before touching anything so the commit stays atomic. Documents
    // are summed rather than checked line by line so several removals of one
    // product cannot jointly overdraw it.
    let mut deltas: HashMap<Uuid, i64> = HashMap::new();
    for line in &surviving {
        *deltas.entry(line.product_id).or_insert(0) += i64::from(line.signed_delta());
    }
    let mut resulting: HashMap<Uuid, i32> = HashMap::with_capacity(deltas.len());
    for (&product_id, &delta) in &deltas {
        let product = state.product(product_id)?;
        let on_hand = product.quantity_at(adjustment.location_id);
        let new_quantity = i64::from(on_hand) + delta;
        if new_quantity < 0 {
            return Err(ServiceError::InsufficientStock(format!(
                "{} has {} on hand at {}, cannot remove {}",
                product.name, on_hand, adjustment.location_name, -delta
            )));
        }
        let new_quantity = i32::try_from(new_quantity).map_err(|_| {
            ServiceError::InvalidInput(format!(
                "applying {} to {} overflows the stock counter",
                delta, product.name
            ))
        })?;
        resulting.insert(product_id, new_quantity);
    }

    let location_id = adjustment.location_id;
    let location_name = adjustment.location_name.clone();
    let is_sub = state.is_sub_location(location_id)?;
    let now = Utc::now();

    let mut next = state.clone();
    for (&product_id, &new_quantity) in &resulting {
        let product = next.product_mut(product_id)?;
        match product.stock_record_mut(location_id) {
            Some(record) => record.quantity = new_quantity,
            None => product.locations.push(StockRecord {
                location_id,
                quantity: new_quantity,
                is_sub_location: is_sub,
            }),
        }
    }

    let line_count = surviving.len();
    let adj = next.adjustment_mut(adjustment_id)?;
    adj.lines = surviving;
    adj.status = AdjustmentStatus::Approved;
    adj.completed_at = Some(now);
    adj.approved_at = Some(now);
    adj.approved_by = Some(actor.to_string());
    if note.is_some() {
        adj.note = note;
    }
    next.record_audit(
        actor,
        AuditAction::AdjustmentApproved,
        adjustment_id,
        format!("{} line(s) applied at {}", line_count, location_name),
    );
    info!(adjustment_id = %adjustment_id, lines = line_count, "stock adjustment approved");
    Ok(next)
}

/// Rejects a pending adjustment. A non-empty reason is required; no stock
/// is mutated.
#[instrument(skip(state, reason))]
pub fn reject(
    state: &AppState,
    adjustment_id: Uuid,
    actor: &str,
    reason: &str,
) -> Result<AppState, ServiceError> {
    let adjustment = state.adjustment(adjustment_id)?;
    if adjustment.status != AdjustmentStatus::Pending {
        return Err(ServiceError::InvalidStatus(format!(
            "adjustment {} is {}; only pending adjustments can be rejected",
            adjustment_id, adjustment.status
        )));
    }
    if reason.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "a denial reason is required".into(),
        ));
    }

    let now = Utc::now();
    let mut next = state.clone();
    let adj = next.adjustment_mut(adjustment_id)?;
    adj.status = AdjustmentStatus::Rejected;
    adj.completed_at = Some(now);
    adj.rejected_at = Some(now);
    adj.rejected_by = Some(actor.to_string());
    adj.note = Some(reason.to_string());
    next.record_audit(
        actor,
        AuditAction::AdjustmentRejected,
        adjustment_id,
        reason,
    );
    info!(adjustment_id = %adjustment_id, "stock adjustment rejected");
    Ok(next)
}
