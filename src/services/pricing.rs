//! Customer-specific pricing overlays on top of the wholesale price.

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::errors::ServiceError;
use crate::models::{AuditAction, CustomerPrice, Product};
use crate::state::AppState;

/// Resolves the price a customer pays for a product: special price first,
/// then percentage discount, then the plain wholesale price.
pub fn effective_price(product: &Product, overlay: Option<&CustomerPrice>) -> Decimal {
    match overlay {
        Some(cp) => cp.effective_price(product.wholesale_price),
        None => product.wholesale_price,
    }
}

/// Request to attach a pricing overlay to a `(customer, product)` pair.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct AssignPriceRequest {
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub special_price: Option<Decimal>,
    /// Percentage off the wholesale price, 0-100.
    pub discount: Option<Decimal>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

fn validate_price_fields(
    special_price: Option<Decimal>,
    discount: Option<Decimal>,
) -> Result<(), ServiceError> {
    if let Some(price) = special_price {
        if price < Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "special price cannot be negative".into(),
            ));
        }
    }
    if let Some(discount) = discount {
        if discount < Decimal::ZERO || discount > dec!(100) {
            return Err(ServiceError::InvalidInput(
                "discount must be between 0 and 100".into(),
            ));
        }
    }
    Ok(())
}

/// Creates a new overlay. A second overlay for the same pair is a
/// [`ServiceError::Conflict`]; callers wanting to change an existing one
/// use [`update`].
#[instrument(skip(state, req), fields(customer_id = %req.customer_id, product_id = %req.product_id))]
pub fn assign(
    state: &AppState,
    req: &AssignPriceRequest,
    actor: &str,
) -> Result<(AppState, Uuid), ServiceError> {
    req.validate()?;
    validate_price_fields(req.special_price, req.discount)?;
    state.customer(req.customer_id)?;
    let product = state.product(req.product_id)?;

    if state
        .customer_prices
        .iter()
        .any(|cp| cp.customer_id == req.customer_id && cp.product_id == req.product_id)
    {
        return Err(ServiceError::Conflict(format!(
            "customer already has a price entry for {}",
            product.name
        )));
    }

    let id = Uuid::new_v4();
    let mut next = state.clone();
    next.customer_prices.push(CustomerPrice {
        id,
        customer_id: req.customer_id,
        product_id: req.product_id,
        special_price: req.special_price,
        discount: req.discount,
        note: req.note.clone(),
        created_at: chrono::Utc::now(),
    });
    next.record_audit(
        actor,
        AuditAction::PriceAssigned,
        id,
        format!("overlay for {}", product.name),
    );
    info!(price_id = %id, "customer price assigned");
    Ok((next, id))
}

/// Replaces the economic fields and the note of an existing overlay.
/// Passing `None` clears the stored value, so callers send the full
/// desired state rather than a partial patch.
#[instrument(skip(state, note))]
pub fn update(
    state: &AppState,
    price_id: Uuid,
    special_price: Option<Decimal>,
    discount: Option<Decimal>,
    note: Option<String>,
    actor: &str,
) -> Result<AppState, ServiceError> {
    validate_price_fields(special_price, discount)?;
    state
        .customer_prices
        .iter()
        .find(|cp| cp.id == price_id)
        .ok_or_else(|| ServiceError::not_found("customer price", price_id))?;

    let mut next = state.clone();
    let overlay = next
        .customer_prices
        .iter_mut()
        .find(|cp| cp.id == price_id)
        .ok_or_else(|| ServiceError::not_found("customer price", price_id))?;
    overlay.special_price = special_price;
    overlay.discount = discount;
    overlay.note = note;
    next.record_audit(actor, AuditAction::PriceUpdated, price_id, "overlay updated");
    info!(price_id = %price_id, "customer price updated");
    Ok(next)
}

/// Products that do not yet carry an overlay for the customer, i.e. the
/// choices a creation form may offer without risking duplicates.
pub fn selectable_products(state: &AppState, customer_id: Uuid) -> Vec<&Product> {
    let taken: HashSet<Uuid> = state
        .customer_prices
        .iter()
        .filter(|cp| cp.customer_id == customer_id)
        .map(|cp| cp.product_id)
        .collect();
    state
        .products
        .iter()
        .filter(|p| !taken.contains(&p.id))
        .collect()
}
